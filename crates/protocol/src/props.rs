//! Canonical names of the properties pushed to the client crop widget.
//!
//! These are the exact state keys the client element reads, so every
//! server-side accessor and the bridge's update stream must agree on them.

pub const IMG_SRC: &str = "imgSrc";
pub const IMG_ALT: &str = "imgAlt";
pub const CROP: &str = "crop";
pub const ASPECT: &str = "aspect";
pub const CIRCULAR_CROP: &str = "circularCrop";
pub const KEEP_SELECTION: &str = "keepSelection";
pub const DISABLED: &str = "disabled";
pub const LOCKED: &str = "locked";
pub const MIN_WIDTH: &str = "minWidth";
pub const MIN_HEIGHT: &str = "minHeight";
pub const MAX_WIDTH: &str = "maxWidth";
pub const MAX_HEIGHT: &str = "maxHeight";
pub const RULE_OF_THIRDS: &str = "ruleOfThirds";

/// All recognized outbound keys, in the order the client declares them.
pub const ALL: &[&str] = &[
    IMG_SRC,
    IMG_ALT,
    CROP,
    ASPECT,
    CIRCULAR_CROP,
    KEEP_SELECTION,
    DISABLED,
    LOCKED,
    MIN_WIDTH,
    MIN_HEIGHT,
    MAX_WIDTH,
    MAX_HEIGHT,
    RULE_OF_THIRDS,
];
