//! Newtype wrappers for domain identifiers.
//!
//! Every identifier is a UUID and travels on the wire as its canonical
//! hyphenated string, which is also what GraphQL `ID` fields return.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Fresh time-ordered identifier.
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Identifies a customer account.
    UserId
);
uuid_id!(
    /// Identifies a catalog product.
    ProductId
);
uuid_id!(
    /// Identifies a purchasable variant of a product.
    VariantId
);
uuid_id!(
    /// Identifies a checkout (cart).
    CheckoutId
);
uuid_id!(
    /// Identifies one line of a checkout.
    CheckoutLineId
);
uuid_id!(
    /// Identifies an order placed from a completed checkout.
    OrderId
);
uuid_id!(OrderLineId);
