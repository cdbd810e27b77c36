use snafu::Snafu;

/// Errors surfaced at the host-facing boundary of the document engine.
///
/// These map onto the three error kinds the engine distinguishes: a
/// malformed patch, allocator depth exhaustion, and the allocator's
/// equal-bounds assertion. `IndexOutOfRange` and `SiteAlreadyEditing` are
/// Rust-specific additions so the API never panics across a safe boundary.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("visible index {} out of range (document has {} characters)", index, len))]
    IndexOutOfRange { index: usize, len: usize },

    #[snafu(display("malformed patch: {}", reason))]
    MalformedPatch { reason: String },

    #[snafu(display(
        "allocator depth exhausted: no free slot found within {} levels",
        max_depth
    ))]
    DepthExhausted { max_depth: u32 },

    #[snafu(display("allocator called with equal bounds; neighbours were not consulted"))]
    EqualBounds,

    #[snafu(display("set_site called after the first local edit"))]
    SiteAlreadyEditing,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
