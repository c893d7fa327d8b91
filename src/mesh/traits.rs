use num_traits::{AsPrimitive, FromPrimitive, PrimInt};
use std::fmt::Debug;

/// Index buffer element. The mesh, octree and queries are monomorphized
/// over the index width; results keep the width of the source buffer.
pub trait Index: PrimInt + AsPrimitive<usize> + FromPrimitive + Debug + 'static {}

impl Index for i8 {}
impl Index for u8 {}
impl Index for i16 {}
impl Index for u16 {}
impl Index for i32 {}
impl Index for u32 {}

#[cfg(feature = "index64")]
impl Index for i64 {}
#[cfg(feature = "index64")]
impl Index for u64 {}
