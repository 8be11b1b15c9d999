//! Default collaborators: HTTP drivers, token sources and the requester that
//! executes descriptors.

mod driver;
pub use self::driver::{Driver, HttpDriver, RawResponse};

mod init;
pub use self::init::{prepare_request_data, InitBody, RequestInit};

mod progress;
pub use self::progress::{Direction, ProgressDriver, ProgressEvent};

mod requester;
pub use self::requester::{Reply, RequestDataGetter, RequestHandler, Requester};

mod token;
pub use self::token::{TokenSource, TokenStore, TokenType};
