#[cfg(feature = "indexmap")]
mod indexmap;

#[cfg(feature = "serde")]
mod serde;
