/// Runs storage work on the calling thread. Desktop handlers are already
/// off the render path, so loads complete before the next frame.
pub fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    f()
}
