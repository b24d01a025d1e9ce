//! Backend channel endpoint paths.

use crate::board::BoardId;

/// Path fragments of the backend's board routes.
pub struct Routes;

impl Routes {
    pub const BOARD_PREFIX: &str = "/b/";
    pub const SGF: &str = "sgf";
    pub const SGFIX: &str = "sgfix";
}

/// Which backend channel a request talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The board's root path, where events are delivered.
    Events,
    /// Current SGF document of the board.
    Sgf,
    /// Repaired SGF document of the board.
    Sgfix,
}

impl Endpoint {
    /// Channel path for `board`, e.g. `/b/abc123/sgf`.
    pub fn path(self, board: &BoardId) -> String {
        match self {
            Self::Events => format!("{}{board}", Routes::BOARD_PREFIX),
            Self::Sgf => format!("{}{board}/{}", Routes::BOARD_PREFIX, Routes::SGF),
            Self::Sgfix => format!("{}{board}/{}", Routes::BOARD_PREFIX, Routes::SGFIX),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Sgf => Routes::SGF,
            Self::Sgfix => Routes::SGFIX,
        }
    }
}
