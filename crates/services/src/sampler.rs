use rand::Rng;
use rand::rng;

//
// ─── SAMPLER ──────────────────────────────────────────────────────────────────
//

/// Draws up to `count` items from `items` without replacement.
///
/// Runs a full Fisher-Yates shuffle over a copy (index from the back down to
/// 1, uniform swap partner in `[0, i]`) and truncates, so every k-subset and
/// every ordering within it is equally likely no matter what `count` is.
/// `count` is clamped to the slice length; zero, or an empty slice, gives an
/// empty selection.
#[must_use]
pub fn sample_with<R, T>(rng: &mut R, items: &[T], count: usize) -> Vec<T>
where
    R: Rng + ?Sized,
    T: Clone,
{
    let mut drawn = items.to_vec();
    for i in (1..drawn.len()).rev() {
        let j = rng.random_range(0..=i);
        drawn.swap(i, j);
    }
    drawn.truncate(count.min(drawn.len()));
    drawn
}

/// [`sample_with`] using the thread-local generator.
#[must_use]
pub fn sample<T: Clone>(items: &[T], count: usize) -> Vec<T> {
    sample_with(&mut rng(), items, count)
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
