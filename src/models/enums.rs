use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form is the label shown to clinicians and stored in the database.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
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

str_enum!(RiskFactor {
    HighBloodPressure => "High Blood Pressure",
    Diabetes => "Diabetes",
    HeartDisease => "Heart Disease",
    Osteoporosis => "Osteoporosis",
});

str_enum!(Goal {
    ImproveBalance => "Improve Balance",
    ReducePain => "Reduce Pain",
    IncreaseStrength => "Increase Strength",
    WeightLoss => "Weight Loss",
});

str_enum!(Frequency {
    TwicePerWeek => "2 times per week",
    ThreeTimesPerWeek => "3 times per week",
    FourTimesPerWeek => "4 times per week",
    FiveTimesPerWeek => "5 times per week",
});

str_enum!(SessionDuration {
    Minutes15 => "15 minutes",
    Minutes20 => "20 minutes",
    Minutes30 => "30 minutes",
    Minutes45 => "45 minutes",
});

str_enum!(Difficulty {
    Beginner => "Beginner",
    Moderate => "Moderate",
    Advanced => "Advanced",
});

/// Condition labels offered when generating a prescription.
pub const CONDITION_LABELS: &[&str] = &[
    "Fall Prevention",
    "Pain Management",
    "Diabetes Management",
    "Weight Management",
];
