//! Trait composition validation
#[path = "../common.rs"]
mod common;
use common::{check_should_fail_with, check_should_pass};

// Cycles
#[test] fn trait_uses_itself() { check_should_fail_with(r#"file=[{trait=[{name="T",uses=["T"]}]}]"#, "trait composition cycle: T -> T"); }
#[test] fn two_trait_cycle() { check_should_fail_with(r#"file=[{trait=[{name="T",uses=["U"]},{name="U",uses=["T"]}]}]"#, "trait composition cycle: U -> T -> U"); }
#[test] fn three_trait_cycle() { check_should_fail_with(r#"file=[{trait=[{name="T",uses=["U"]},{name="U",uses=["V"]},{name="V",uses=["T"]}]}]"#, "trait composition cycle"); }
#[test] fn diamond_is_not_a_cycle() { check_should_pass(r#"file=[{trait=[{name="Base"},{name="L",uses=["Base"]},{name="R",uses=["Base"]}],class=[{name="C",uses=["L","R"]}]}]"#); }
#[test] fn repeated_use_is_fine() { check_should_pass(r#"file=[{trait=[{name="T"}],class=[{name="C",uses=["T","T"]}]}]"#); }

// Invalid targets
#[test] fn class_uses_class() { check_should_fail_with(r#"file=[{class=[{name="D"},{name="C",uses=["D"]}]}]"#, "`D` is a class, only traits can be used"); }
#[test] fn class_uses_function() { check_should_fail_with(r#"file=[{class=[{name="C",uses=["f"]}],function=[{name="f"}]}]"#, "`f` is a function, only traits can be used"); }
#[test] fn class_uses_method() { check_should_fail_with(r#"file=[{trait=[{name="T",method=[{name="m"}]}],class=[{name="C",uses=["T::m"]}]}]"#, "`m` is a method, only traits can be used"); }
#[test] fn module_level_trait_across_modules() { check_should_pass(r#"modules=["A","B"]
file=[{module="A",unstable_features=["module_level_traits"],trait=[{name="T",module_level=true}]},{module="B",class=[{name="C",uses=["T"]}]}]"#); }

// Module-level marker only applies to traits
#[test] fn class_marked_module_level() { check_should_fail_with(r#"file=[{class=[{name="C",module_level=true}]}]"#, "class 'C' cannot be module-level; only traits can"); }
#[test] fn method_marked_entry_point() { check_should_fail_with(r#"file=[{class=[{name="C",method=[{name="m",entry_point=true}]}]}]"#, "only free functions can"); }

// Large graphs
fn diamond_ladder(levels: usize) -> String {
    let mut traits = Vec::new();
    for i in 0..levels {
        traits.push(format!(r#"{{name="T{i}",uses=["L{i}","R{i}"]}}"#));
        traits.push(format!(r#"{{name="L{i}",uses=["T{}"]}}"#, i + 1));
        traits.push(format!(r#"{{name="R{i}",uses=["T{}"]}}"#, i + 1));
    }
    traits.push(format!(r#"{{name="T{levels}",method=[{{name="m",calls=["D::foo"]}}]}}"#));
    format!(
        r#"file=[{{class=[{{name="D",method=[{{name="foo",visibility="internal"}}]}},{{name="C",uses=["T0"]}}],trait=[{}],function=[{{name="f",calls=["C::m"]}}]}}]"#,
        traits.join(",")
    )
}
#[test] fn diamond_ladder_checks() { let report = check_should_pass(&diamond_ladder(30)); assert_eq!(report.checked, 2); }
#[test] fn diamond_ladder_unknown_member() { check_should_fail_with(&diamond_ladder(30).replace("C::m", "C::missing"), "undefined symbol `C::missing`"); }
