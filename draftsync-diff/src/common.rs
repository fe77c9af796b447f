//! Building blocks shared by every entity diff.

/// Emits the action built by `make` only when `old` and `new` differ.
///
/// This is the single field rule of the engine: value equality, with two
/// absent values counting as equal.
pub fn build_update_action<T, A>(old: &T, new: &T, make: impl FnOnce() -> A) -> Option<A>
where
    T: PartialEq + ?Sized,
{
    (old != new).then(make)
}

/// Elements of `left` that have no counterpart in `right` under `same`,
/// in `left`'s iteration order and without repeats.
pub fn difference_by<'a, T>(
    left: &'a [T],
    right: &[T],
    same: impl Fn(&T, &T) -> bool,
) -> Vec<&'a T> {
    let mut result: Vec<&T> = Vec::new();
    for candidate in left {
        let in_right = right.iter().any(|r| same(candidate, r));
        let already_taken = result.iter().any(|taken| same(candidate, *taken));
        if !in_right && !already_taken {
            result.push(candidate);
        }
    }
    result
}

/// Removal and addition actions for an unordered set: one remove per element
/// only in `old`, then one add per element only in `new`.
pub(crate) fn build_set_actions<T, A>(
    old: &[T],
    new: &[T],
    same: impl Fn(&T, &T) -> bool,
    remove: impl Fn(&T) -> A,
    add: impl Fn(&T) -> A,
) -> Vec<A> {
    let removed = difference_by(old, new, &same);
    let added = difference_by(new, old, &same);
    removed
        .into_iter()
        .map(remove)
        .chain(added.into_iter().map(add))
        .collect()
}
