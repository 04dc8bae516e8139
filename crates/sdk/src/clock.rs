/// Monotonic integer naming one leader-production window.
pub type Slot = u64;

/// A fixed number of consecutive slots over which validator stake is static.
pub type Epoch = u64;

/// Indivisible balance unit.
pub type Lamports = u64;

/// Unix timestamp in seconds, as stored on blocks and votes.
pub type UnixTimestamp = u64;
