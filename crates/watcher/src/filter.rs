//! Operation filtering

use onchange_core::Ops;

/// True if any operation in `ops` is part of `mask`
pub fn is_interesting(ops: Ops, mask: Ops) -> bool {
    ops.intersects(mask)
}
