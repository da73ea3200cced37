/// Whether an authenticated session is present. A closed gate means panels show
/// their fallback data and the store is never queried.
pub trait SessionGate: Send + Sync {
    fn is_open(&self) -> bool;
}

impl SessionGate for bool {
    fn is_open(&self) -> bool {
        *self
    }
}
