/// Register access tag.
pub trait Access: Sized + Default + Copy + 'static {}

/// Access tag that permits loading the register.
pub trait Readable: Access {}

/// Access tag that permits storing the register.
pub trait Writable: Access {}

/// Read-write register tag.
#[derive(Clone, Copy, Default, Debug)]
pub struct ReadWrite;

impl Access for ReadWrite {}
impl Readable for ReadWrite {}
impl Writable for ReadWrite {}

/// Read-only register tag.
#[derive(Clone, Copy, Default, Debug)]
pub struct ReadOnly;

impl Access for ReadOnly {}
impl Readable for ReadOnly {}

/// Write-only register tag.
#[derive(Clone, Copy, Default, Debug)]
pub struct WriteOnly;

impl Access for WriteOnly {}
impl Writable for WriteOnly {}

/// Access tag of a field within a register tagged `R`.
///
/// A field may drop either capability of its register but never gain one, so
/// read-only status bits of a read-write register reject writes at build time.
pub trait FieldAccess<R: Access>: Access {}

impl FieldAccess<ReadWrite> for ReadWrite {}
impl FieldAccess<ReadWrite> for ReadOnly {}
impl FieldAccess<ReadWrite> for WriteOnly {}
impl FieldAccess<ReadOnly> for ReadOnly {}
impl FieldAccess<WriteOnly> for WriteOnly {}
