/// Shared closed enumerations used by models, the access gate and handlers.
///
/// Every enum here is stored as TEXT and parsed on read, so an unexpected value
/// in the store surfaces as a decode error instead of a silently wrong variant.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("invalid {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

text_enum! {
    /// Identity role. New registrations are always `Client`.
    Role("role") {
        Admin => "admin",
        Team => "team",
        Client => "client",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

text_enum! {
    /// Publication workflow for blog posts and portfolio projects.
    ContentStatus("content status") {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

text_enum! {
    /// Lifecycle of a client project.
    ProjectStatus("project status") {
        Pending => "pending",
        InProgress => "in_progress",
        Review => "review",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

text_enum! {
    OrderStatus("order status") {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

text_enum! {
    MessageType("message type") {
        AdminToUser => "admin_to_user",
        UserToAdmin => "user_to_admin",
        Notification => "notification",
    }
}

text_enum! {
    ContactStatus("contact status") {
        New => "new",
        Read => "read",
        Replied => "replied",
        Archived => "archived",
    }
}

text_enum! {
    /// Type tag used only to parse a setting's stored string on read.
    SettingType("setting type") {
        String => "string",
        Number => "number",
        Boolean => "boolean",
        Json => "json",
    }
}
