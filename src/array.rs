//! Copy-on-write helpers over dense child arrays.

pub fn insert_at<T: Clone>(index: usize, values: &[T], value: T) -> Vec<T> {
    debug_assert!(index <= values.len());

    let mut other = Vec::with_capacity(values.len() + 1);

    other.extend_from_slice(&values[..index]);
    other.push(value);
    other.extend_from_slice(&values[index..]);

    other
}

pub fn override_at<T: Clone>(index: usize, values: &[T], value: T) -> Vec<T> {
    debug_assert!(index < values.len());

    let mut other = values.to_vec();

    other[index] = value;

    other
}

pub fn delete_at<T: Clone>(index: usize, values: &[T]) -> Vec<T> {
    debug_assert!(index < values.len());

    let mut other = Vec::with_capacity(values.len() - 1);

    other.extend_from_slice(&values[..index]);
    other.extend_from_slice(&values[index + 1..]);

    other
}
