//! Short display names for test methods.
//!
//! SharpCover method signatures look like
//! `MyNamespace.MyClass.MyTest/0`: dot-separated namespace and type
//! segments, then a `/` separating the method name from its overload
//! index. Renderers want just `MyTest/0`.

/// Strip the namespace/type qualification from a full method signature.
///
/// Everything before the last `.` preceding the first `/` is dropped; the
/// rest of the signature (including the `/` suffix) is kept. Signatures
/// without a `/` are returned unchanged; the trace format always emits
/// one, so this only matters for hand-built inputs.
#[must_use]
pub fn short_display_name(signature: &str) -> &str {
    let Some(slash) = signature.find('/') else {
        return signature;
    };
    match signature[..slash].rfind('.') {
        Some(dot) => &signature[dot + 1..],
        None => signature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_namespace_and_type() {
        assert_eq!(
            short_display_name("MyNamespace.MyClass.MyTest/0"),
            "MyTest/0"
        );
    }

    #[test]
    fn test_deeply_nested_namespace() {
        assert_eq!(
            short_display_name("A.B.C.D.Fixture.Check/12"),
            "Check/12"
        );
    }

    #[test]
    fn test_keeps_everything_after_the_slash() {
        // Dots after the slash must not affect the cut point.
        assert_eq!(
            short_display_name("Ns.Type.Run/0.extra"),
            "Run/0.extra"
        );
    }

    #[test]
    fn test_no_dot_before_slash() {
        assert_eq!(short_display_name("Test/3"), "Test/3");
    }

    #[test]
    fn test_no_slash_falls_back_to_full_signature() {
        assert_eq!(short_display_name("Ns.Type.Test"), "Ns.Type.Test");
    }
}
