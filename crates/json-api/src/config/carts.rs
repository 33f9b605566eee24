//! Carts Config

use clap::Args;

/// Cart write settings.
#[derive(Debug, Args)]
pub struct CartsConfig {
    /// Apply concurrent writes to the same cart one at a time
    #[arg(long, env = "SERIALIZE_CART_WRITES", default_value_t = false)]
    pub serialize_cart_writes: bool,
}
