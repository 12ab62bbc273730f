//! English list joining

/// Join items as an English list with an Oxford comma.
///
/// `[]` → `""`, `[A]` → `"A"`, `[A, B]` → `"A and B"`,
/// `[A, B, C]` → `"A, B, and C"`.
pub fn join_list<T, F>(items: &[T], to_text: F) -> String
where
    F: Fn(&T) -> String,
{
    let texts: Vec<String> = items.iter().map(to_text).collect();
    match texts.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}
