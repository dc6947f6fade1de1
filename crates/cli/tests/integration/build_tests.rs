//! Build command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

fn engine_env() -> TestEnv {
  let env = TestEnv::new();
  env.module("core", r#"{ "targetType": "static-lib" }"#, &["text.cpp", "math.cpp"]);
  env.module(
    "engine",
    r#"{ "targetType": "executable", "dependencies": ["core"], "libraries": ["m"] }"#,
    &["main.cpp"],
  );
  env
}

#[test]
fn first_build_compiles_and_links() {
  let env = engine_env();

  env
    .onabuild_cmd()
    .arg("engine")
    .assert()
    .success()
    .stdout(predicate::str::contains("Built engine"))
    .stdout(predicate::str::contains("Compiled: 3"))
    .stdout(predicate::str::contains("Linked: 2"));

  assert!(env.output_path().join("core.a").exists());
  assert!(env.output_path().join("engine").exists());

  let link = env
    .invocations()
    .into_iter()
    .find(|line| line.contains("engine/source/main.cpp.o") && !line.contains(" -c "))
    .expect("engine link recorded");
  assert!(link.contains("core.a"));
  assert!(link.ends_with("-lm"));
}

#[test]
fn second_build_has_nothing_to_do() {
  let env = engine_env();
  env.onabuild_cmd().arg("engine").assert().success();
  env.clear_log();

  env
    .onabuild_cmd()
    .arg("engine")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to be done"));

  assert!(env.invocations().is_empty());
}

#[test]
fn edited_source_recompiles_only_that_file() {
  let env = engine_env();
  env.onabuild_cmd().arg("engine").assert().success();
  env.clear_log();

  env.touch("modules/core/source/math.cpp");

  env
    .onabuild_cmd()
    .arg("engine")
    .assert()
    .success()
    .stdout(predicate::str::contains("Compiled: 1"))
    .stdout(predicate::str::contains("Linked: 2"));

  let compiles: Vec<_> = env.invocations().into_iter().filter(|l| l.contains(" -c ")).collect();
  assert_eq!(compiles.len(), 1);
  assert!(compiles[0].contains("math.cpp"));
}

#[test]
fn compile_failure_exits_with_tool_code() {
  let env = TestEnv::new();
  env.module("core", r#"{ "targetType": "static-lib" }"#, &["broken.cpp"]);

  env
    .onabuild_cmd()
    .arg("core")
    .assert()
    .failure()
    .code(3)
    .stderr(predicate::str::contains("cannot compile"));

  assert!(!env.output_path().join("core.a").exists());
  assert!(env.invocations().iter().all(|line| !line.starts_with("ar ")));
}

#[test]
fn failing_dependency_stops_the_build() {
  let env = TestEnv::new();
  env.module("core", r#"{ "targetType": "static-lib" }"#, &["broken.cpp"]);
  env.module(
    "engine",
    r#"{ "targetType": "executable", "dependencies": ["core"] }"#,
    &["main.cpp"],
  );

  env.onabuild_cmd().arg("engine").assert().failure().code(3);

  assert!(!env.output_path().join("engine").exists());
  assert!(env.invocations().iter().all(|line| !line.contains("main.cpp")));
}

#[test]
fn shared_library_dependency_links_by_name() {
  let env = TestEnv::new();
  env.module("gfx", r#"{ "targetType": "shared-lib" }"#, &["draw.cpp"]);
  env.module(
    "viewer",
    r#"{ "targetType": "executable", "dependencies": ["gfx"] }"#,
    &["main.cpp"],
  );

  env.onabuild_cmd().arg("viewer").assert().success();

  assert!(env.output_path().join("libgfx.so").exists());
  let log = env.invocations();
  assert!(log.iter().any(|line| line.contains("-fPIC") && line.contains("draw.cpp")));
  assert!(log.iter().any(|line| line.contains("viewer/source/main.cpp.o") && line.contains("-lgfx")));
}

#[test]
fn dependency_cycle_is_rejected() {
  let env = TestEnv::new();
  env.module("a", r#"{ "targetType": "static-lib", "dependencies": ["b"] }"#, &["a.cpp"]);
  env.module("b", r#"{ "targetType": "static-lib", "dependencies": ["a"] }"#, &["b.cpp"]);

  env
    .onabuild_cmd()
    .arg("a")
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("a -> b -> a"));

  assert!(env.invocations().is_empty());
}
