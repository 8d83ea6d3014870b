pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const GENESIS_INDEX: u64 = 0;
pub const GENESIS_TIMESTAMP: &str = "01/01/2018";
pub const GENESIS_DATA: &str = "Genesis Block";
pub const GENESIS_PREVIOUS_HASH: &str = "000";
pub const GENESIS_HASH: &str = "00b2076ec70278f788a9601308ed3e338ec68511faf878c210ce35bb75f3e333";
pub const DEFAULT_DIFFICULTY: u32 = 4;
