use std::io::Write;

use platformer_editor::scripting::{build_engine, EnemyKind, ObjectManager, ScriptHost};
use rhai::{EvalAltResult, ImmutableString, Scope, FLOAT};

#[test]
fn eato_constructor_hands_object_to_manager() {
    let objects = ObjectManager::shared();
    let (engine, table, _logs) = build_engine(&objects).expect("engine");
    assert!(table.has_class("Eato"));

    let spawned: bool = engine.eval("let e = Eato(); e.spawned").expect("spawn");
    assert!(spawned);

    let objects = objects.borrow();
    assert_eq!(objects.len(), 1);
    let (_, eato) = objects.iter().next().expect("one object");
    assert_eq!(eato.kind, EnemyKind::Eato);
    assert!(eato.spawned);
    assert_eq!(eato.image_dir, "enemy/eato/brown/");
}

#[test]
fn image_dir_round_trips_through_the_manager() {
    let objects = ObjectManager::shared();
    let (engine, _, _) = build_engine(&objects).expect("engine");

    let dir: ImmutableString = engine.eval(r#"let e = Eato("enemy/eato/white/"); e.image_dir"#).expect("getter");
    assert_eq!(dir, "enemy/eato/white/");

    engine
        .run(
            r#"
            let e = Eato();
            e.image_dir = "enemy/eato/black/";
            e.x = 32.0;
            e.y = -16.0;
            "#,
        )
        .expect("setters");
    let objects = objects.borrow();
    let (_, eato) = objects.iter().last().expect("second eato");
    assert_eq!(eato.image_dir, "enemy/eato/black/");
    assert_eq!((eato.position.x, eato.position.y), (32.0, -16.0));
}

#[test]
fn constructor_with_wrong_argument_type_is_a_script_error() {
    let objects = ObjectManager::shared();
    let (engine, _, _) = build_engine(&objects).expect("engine");

    let err = engine.run("Eato(42);").unwrap_err();
    assert!(matches!(*err, EvalAltResult::ErrorFunctionNotFound(..)), "unexpected error: {err}");
    assert!(objects.borrow().is_empty());
}

#[test]
fn rand_with_invalid_bounds_returns_the_lower_bound() {
    let (engine, _, _) = build_engine(&ObjectManager::shared()).expect("engine");

    let nan: FLOAT = engine.eval("rand(0.0 / 0.0, 1.0)").expect("nan lower bound");
    assert!(nan.is_nan());
    let upper_nan: FLOAT = engine.eval("rand(0.0, 0.0 / 0.0)").expect("nan upper bound");
    assert_eq!(upper_nan, 0.0);
    let unbounded: FLOAT = engine.eval("rand(0.0, 1.0 / 0.0)").expect("infinite upper bound");
    assert_eq!(unbounded, 0.0);
    let from_below: FLOAT = engine.eval("rand(-1.0 / 0.0, 0.0)").expect("infinite lower bound");
    assert!(from_below.is_infinite());
    let reversed: FLOAT = engine.eval("rand(2.0, 1.0)").expect("reversed bounds");
    assert_eq!(reversed, 2.0);

    let value: FLOAT = engine.eval("rand(1.0, 2.0)").expect("valid bounds");
    assert!((1.0..2.0).contains(&value));
}

#[test]
fn stale_handle_reports_an_error() {
    let objects = ObjectManager::shared();
    let (engine, _, _) = build_engine(&objects).expect("engine");
    let mut scope = Scope::new();
    engine.run_with_scope(&mut scope, "let e = Eato();").expect("spawn");

    objects.borrow_mut().clear();
    let err = engine.eval_with_scope::<FLOAT>(&mut scope, "e.x").unwrap_err();
    assert!(err.to_string().contains("no longer managed"), "unexpected error: {err}");
}

#[test]
fn host_runs_init_once_then_update_every_frame() {
    let mut script = tempfile::Builder::new().suffix(".rhai").tempfile().expect("temp script");
    write!(
        script,
        r#"
        print("loaded");

        fn init() {{
            let e = Eato();
            e.x = 10.0;
            log("init");
        }}

        fn update(dt) {{
            log("tick");
        }}
        "#
    )
    .expect("write script");

    let objects = ObjectManager::shared();
    let mut host = ScriptHost::new(script.path(), objects.clone()).expect("host");
    host.update(1.0 / 60.0);
    assert_eq!(host.last_error(), None);
    assert_eq!(host.take_logs(), ["loaded", "init", "tick"]);

    host.update(1.0 / 60.0);
    assert_eq!(host.take_logs(), ["tick"]);
    assert_eq!(objects.borrow().len(), 1);
    let x = objects.borrow().iter().next().map(|(_, eato)| eato.position.x);
    assert_eq!(x, Some(10.0));

    let dir = host.eval(r#"let w = Eato("enemy/eato/white/"); w.image_dir"#).expect("eval");
    assert_eq!(dir.as_deref(), Some("enemy/eato/white/"));
    assert_eq!(host.eval("let unit = 1;").expect("eval"), None);
    assert_eq!(objects.borrow().len(), 2);
}

#[test]
fn host_reports_compile_errors() {
    let mut script = tempfile::Builder::new().suffix(".rhai").tempfile().expect("temp script");
    write!(script, "fn update(dt) {{ let = ; }}").expect("write script");

    let mut host = ScriptHost::new(script.path(), ObjectManager::shared()).expect("host");
    assert!(host.force_reload().is_err());
    host.update(0.1);
    assert!(host.last_error().is_some_and(|err| err.contains("Compiling")));
}

#[test]
fn broken_script_is_not_reloaded_until_it_changes() {
    let mut script = tempfile::Builder::new().suffix(".rhai").tempfile().expect("temp script");
    write!(script, "print(\"loaded\");\nthrow \"boom\";\n").expect("write script");

    let mut host = ScriptHost::new(script.path(), ObjectManager::shared()).expect("host");
    host.update(0.1);
    assert!(host.last_error().is_some_and(|err| err.contains("Running")));
    assert_eq!(host.take_logs(), ["loaded"]);

    for _ in 0..3 {
        host.update(0.1);
    }
    assert!(host.take_logs().is_empty(), "unchanged script must not run again");
    assert!(host.last_error().is_some());
}
