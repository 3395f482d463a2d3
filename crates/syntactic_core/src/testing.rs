//! Macros for easily making token policy tests.

/// A macro for generating token policy tests.
///
/// Every `pass` snippet must satisfy the policy and every `fail` snippet must break it.
/// Snippets are tokenized as scripts.
///
/// ```ignore
/// policy_tests! {
///     no_while_loops,
///     policy: { blacklist: { Keyword: ["while"] } },
///     pass: { "for (;;) {}" },
///     fail: { "while (true) {}" },
/// }
/// ```
#[macro_export]
macro_rules! policy_tests {
    (
    $name:ident,
    policy: { $($list:ident: { $($kind:ident: [$($value:literal),* $(,)?]),* $(,)? }),* $(,)? },
    pass: {
        $(
            $(#[$pass_meta:meta])*
            $pass_code:literal
        ),* $(,)?
    },
    fail: {
        $(
            $(#[$fail_meta:meta])*
            $fail_code:literal
        ),* $(,)?
    } $(,)?) => {
        mod $name {
            #[allow(unused_imports)]
            use super::*;

            fn policy() -> $crate::Policy {
                #[allow(unused_mut)]
                let mut spec = $crate::PolicySpec::default();
                $(
                    spec.$list = Some(
                        vec![
                            $(
                                (
                                    stringify!($kind).to_string(),
                                    vec![$($value.to_string()),*],
                                )
                            ),*
                        ]
                        .into_iter()
                        .collect(),
                    );
                )*
                $crate::Policy::compile(spec).expect("invalid policy in test")
            }

            #[test]
            fn pass() {
                let policy = policy();
                $(
                    let res = policy
                        .verify(&$crate::lang::EcmaScript::script(), $pass_code)
                        .expect("failed to tokenize test code");
                    if !res.status {
                        panic!("\nExpected:\n```\n{}\n```\nto satisfy the policy, but instead it was flagged:\n\n{:#?}", $pass_code, res.flags);
                    }
                )*
            }

            #[test]
            fn fail() {
                let policy = policy();
                $(
                    let res = policy
                        .verify(&$crate::lang::EcmaScript::script(), $fail_code)
                        .expect("failed to tokenize test code");
                    if res.status {
                        panic!("\nExpected:\n```\n{}\n```\nto break the policy, but instead it passed", $fail_code);
                    }
                )*
            }
        }
    };
}
