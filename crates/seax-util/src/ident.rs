//! Random identifier generation for compiler-introduced names.

use rand::Rng;

/// Generates an identifier made of `prefix` followed by `len` random
/// lowercase ASCII letters.
pub fn random_ident(prefix: &str, len: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(prefix.len() + len);
    out.push_str(prefix);
    for _ in 0..len {
        out.push(rng.gen_range(b'a'..=b'z') as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_prefix_and_length() {
        let name = random_ident("__f_ret_", 10);
        assert!(name.starts_with("__f_ret_"));
        assert_eq!(name.len(), "__f_ret_".len() + 10);
        assert!(name["__f_ret_".len()..].chars().all(|c| c.is_ascii_lowercase()));
    }
}
