mod matcher;
pub(crate) mod path;
mod route_table;

pub use self::matcher::{find_route, match_pattern};
pub use self::path::{normalize_path, static_prefix};
pub use self::route_table::{Route, RouteTable};
