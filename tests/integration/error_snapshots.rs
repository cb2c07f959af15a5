//! Snapshot tests for diagnostic message formatting.
//!
//! Uses insta to capture error messages and detect regressions.
//! Run `cargo insta review` to review changes.

use insta::assert_snapshot;

fn check_error(source: &str) -> String {
    match modvis::check_source(source) {
        Ok(report) => report.rejections.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("\n"),
        Err(err) => err.to_string(),
    }
}

#[test]
fn cross_module_internal_access() {
    let source = r#"modules=["A","B"]
file=[{module="A",class=[{name="D",method=[{name="foo",visibility="internal"}]}]},{module="B",function=[{name="main",calls=["D::foo"]}]}]"#;
    assert_snapshot!(check_error(source), @"cannot access internal member `foo` of module `A` from module `B`");
}

#[test]
fn duplicate_class() {
    let source = r#"file=[{class=[{name="D"},{name="D"}]}]"#;
    assert_snapshot!(check_error(source), @"duplicate declaration: class `D` is already declared");
}

#[test]
fn undefined_symbol() {
    let source = r#"file=[{function=[{name="main",calls=["D::foo"]}]}]"#;
    assert_snapshot!(check_error(source), @"undefined symbol `D::foo`");
}

#[test]
fn undefined_module() {
    assert_snapshot!(check_error(r#"file=[{module="Z"}]"#), @"undefined module `Z`");
}

#[test]
fn composition_cycle() {
    let source = r#"file=[{trait=[{name="T",uses=["U"]},{name="U",uses=["T"]}]}]"#;
    assert_snapshot!(check_error(source), @"trait composition cycle: U -> T -> U");
}

#[test]
fn unstable_feature() {
    let source = r#"file=[{trait=[{name="T",module_level=true}]}]"#;
    assert_snapshot!(check_error(source), @"module-level trait `T` requires the unstable feature `module_level_traits`");
}

#[test]
fn invalid_composition() {
    let source = r#"file=[{class=[{name="D"},{name="C",uses=["D"]}]}]"#;
    assert_snapshot!(check_error(source), @"invalid composition: `D` is a class, only traits can be used");
}

#[test]
fn transitive_attribution_warning() {
    let source = r#"file=[{unstable_features=["module_level_traits"],trait=[{name="U"},{name="T",module_level=true,uses=["U"]}]}]"#;
    let report = modvis::check_source(source).unwrap();
    assert_snapshot!(
        report.warnings[0].to_string(),
        @"module-level trait `T` composes trait `U`; methods of `U` are attributed to module `default` through `T`"
    );
}
