mod descriptor;
pub use self::descriptor::{Body, FormData, LazyUrl, RequestDescriptor};

mod mapper;
pub use self::mapper::{mapper, Mapped, Mapper, Overrides, PathSuffix};

mod method;
pub use self::method::{ContentType, Method};
