/// Declares a closed set of string-valued variants as exchanged with the JS layer.
///
/// Generates the enum with serde renames, `as_str`, `Display` and a `FromStr`
/// that fails with `ParameterError::InvalidValue` for unknown strings.
macro_rules! union_value {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $union_name:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::error::CameraError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value => Ok($name::$variant), )+
                    _ => Err($crate::models::error::ParameterError::InvalidValue {
                        union_name: $union_name.to_string(),
                        received: s.to_string(),
                    }
                    .into()),
                }
            }
        }
    };
}
