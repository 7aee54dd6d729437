use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::db::StoreError;

/// Macro to generate a closed string vocabulary: as_str + FromStr + serde
/// through the same strings the clinic database stores.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
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
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(
    /// Fixed at registration; selects the home view and permissions.
    Role {
        Admin => "Admin",
        Specialist => "Specialist",
        Patient => "Patient",
    }
);

str_enum!(AppointmentStatus {
    Pending => "Pending",
    Accepted => "Accepted",
    Completed => "Completed",
    Cancelled => "Cancelled",
});

str_enum!(AttendanceStatus {
    NotMarked => "Not Marked",
    Present => "Present",
    Absent => "Absent",
});

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl AppointmentStatus {
    /// Completed and Cancelled have no forward action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        Self::NotMarked
    }
}

impl AttendanceStatus {
    pub fn is_marked(&self) -> bool {
        !matches!(self, Self::NotMarked)
    }
}
