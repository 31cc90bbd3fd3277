pub mod fence;
pub mod flatten;
pub mod locate;
pub mod matcher;
pub mod model;
pub mod navigate;
pub mod sanitize;
pub mod splice;

pub use fence::{FetchFence, FetchTicket};
pub use flatten::{flatten, Flattened, TextLeaf};
pub use locate::locate;
pub use matcher::{MatchOpts, RegexMatcher, MIN_QUERY_LEN};
pub use model::{ByteSpan, Match, MatchList};
pub use navigate::{Navigator, NoScroll, ScrollError, ScrollPort, ScrollTarget};
pub use sanitize::{normalize_spaces, sanitize};
pub use splice::{splice, Spliced};
