/// Kotlin-style scope function, handy at the end of long iterator chains.
pub trait LetAlso: Sized {
    /// Consumes `self` and maps it with `f`.
    fn let_owned<R, F: FnOnce(Self) -> R>(self, f: F) -> R {
        f(self)
    }
}

impl<T> LetAlso for T {}
