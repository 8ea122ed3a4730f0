use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(FieldType {
    Number => "number",
    Text => "text",
    Dropdown => "dropdown",
});

str_enum!(ReportStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
});

str_enum!(SaveOperation {
    Created => "created",
    Updated => "updated",
});

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn field_type_round_trip() {
        for (variant, s) in [
            (FieldType::Number, "number"),
            (FieldType::Text, "text"),
            (FieldType::Dropdown, "dropdown"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(FieldType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn report_status_round_trip() {
        for (variant, s) in [
            (ReportStatus::Pending, "pending"),
            (ReportStatus::InProgress, "in_progress"),
            (ReportStatus::Completed, "completed"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ReportStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn unknown_value_is_invalid_enum() {
        let err = FieldType::from_str("checkbox").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }

    #[test]
    fn serde_uses_storage_strings() {
        let json = serde_json::to_string(&ReportStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: ReportStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ReportStatus::InProgress);
    }
}
