//! Lowercase status enums stored as PostgreSQL enum types.

/// Define a status enum whose wire, database and CLI spelling is the
/// lowercase variant name.
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $pg_type:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, sqlx::Type,
        )]
        #[sqlx(type_name = $pg_type, rename_all = "lowercase")]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = shopkit_core::AppError;

            /// Case-insensitive.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let expected: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        shopkit_core::AppError::validation(format!(
                            "invalid {} '{s}', expected one of: {}",
                            $pg_type.replace('_', " "),
                            expected.join(", ")
                        ))
                    })
            }
        }
    };
}

pub(crate) use status_enum;
