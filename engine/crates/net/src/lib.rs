pub mod channels;
pub mod output_router;
pub mod server;
pub mod socket;
pub mod telnet;

pub use channels::{ConnEvent, ConnRx, ConnTx, OutputRx, OutputTx};
pub use socket::Socket;
