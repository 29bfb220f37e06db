/// What the user asked for while the driver was waiting between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Stop the run before the next generation
    Exit,

    /// Cut the current pause short
    Skip,
}
