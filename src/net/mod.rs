pub mod concurrent;
pub mod payload;
pub mod receiver;
pub mod sender;
pub mod socket;
pub mod transfer;
pub use self::payload::*;
pub use self::receiver::*;
pub use self::sender::*;
pub use self::transfer::*;
