/// Round-trip tests: transpile a program to C, build it with the system C
/// compiler, run it, and compare its stdout byte-for-byte with the
/// interpreter's output on the same input.
///
/// The compiler is `$CC` if set, otherwise `cc`.  When neither is usable the
/// tests print a notice and pass without comparing.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use bf::{execute, EngineConfig, EofPolicy, Program, Transpiler};
use proptest::prelude::*;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn c_compiler() -> Option<String> {
    let cc = std::env::var("CC").unwrap_or_else(|_| "cc".to_owned());
    let ok = Command::new(&cc)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    ok.then_some(cc)
}

fn interpret(src: &str, input: &[u8], config: &EngineConfig) -> Vec<u8> {
    let program = Program::from_source(src, config).unwrap();
    let mut out = Vec::new();
    execute(&program, config, &mut &input[..], &mut out).unwrap();
    out
}

fn compile(cc: &str, dir: &Path, src: &str, config: &EngineConfig) -> PathBuf {
    let c_path = dir.join("prog.c");
    let exe = dir.join("prog");
    let file = std::fs::File::create(&c_path).unwrap();
    Transpiler::new(config).transpile(src.as_bytes(), file).unwrap();

    let out = Command::new(cc)
        .arg("-o")
        .arg(&exe)
        .arg(&c_path)
        .output()
        .expect("failed to run C compiler");
    assert!(
        out.status.success(),
        "C compiler rejected transpiled output:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    exe
}

fn run_compiled(exe: &Path, input: &[u8]) -> Vec<u8> {
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn compiled program");
    // A program that never reads may exit before its input is written.
    if let Err(e) = child.stdin.take().expect("stdin not open").write_all(input) {
        assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe, "write to stdin: {e}");
    }
    let out = child.wait_with_output().expect("wait failed");
    assert!(out.status.success());
    out.stdout
}

/// Assert compiled and interpreted runs agree for every `(source, input)`.
fn assert_round_trip(cases: &[(&str, &[u8])], config: &EngineConfig) {
    let Some(cc) = c_compiler() else {
        eprintln!("no C compiler found; skipping round-trip comparison");
        return;
    };
    for (src, input) in cases {
        let dir = tempfile::tempdir().unwrap();
        let exe = compile(&cc, dir.path(), src, config);
        let compiled = run_compiled(&exe, input);
        let interpreted = interpret(src, input, config);
        assert_eq!(compiled, interpreted, "outputs differ for program {src:?}");
    }
}

// ── Cases ─────────────────────────────────────────────────────────────────────

const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

#[test]
fn straight_line_and_loops() {
    let cases: &[(&str, &[u8])] = &[
        ("", b""),
        ("++++++[>++++++++++<-]>+++++.", b""),
        (HELLO_WORLD, b""),
        // Wraps the counter through 255 before it reaches zero.
        ("--[>+<++++++]>.", b""),
        ("-.+.", b""),
        ("+++[>++[>+++<-]<-]>>.", b""),
    ];
    assert_round_trip(cases, &EngineConfig::default());
}

#[test]
fn input_with_unchanged_eof() {
    let cases: &[(&str, &[u8])] = &[
        (",.,.,.", b"xyz"),
        ("+++++,.", b""),
        (",+.,+.", b"a"),
    ];
    assert_round_trip(cases, &EngineConfig::default());
}

#[test]
fn input_with_sentinel_eof() {
    let zero = EngineConfig { eof: EofPolicy::Sentinel(0), ..EngineConfig::default() };
    let cat: &[(&str, &[u8])] = &[(",[.,]", b"round trip\n"), (",[.,]", b"")];
    assert_round_trip(cat, &zero);

    let ff = EngineConfig { eof: EofPolicy::Sentinel(255), ..EngineConfig::default() };
    let read_past_end: &[(&str, &[u8])] = &[("+++,.", b"")];
    assert_round_trip(read_past_end, &ff);
}

#[test]
fn small_tape() {
    let cfg = EngineConfig { tape_size: 4, ..EngineConfig::default() };
    let cases: &[(&str, &[u8])] = &[(">>>+++.<<<.", b"")];
    assert_round_trip(cases, &cfg);
}

// ── Generated programs ────────────────────────────────────────────────────────

/// Programs that stay on the tape and always halt.  Every `>` is undone by a
/// `<` at the same level, and a loop is `[->…<]`: it decrements its own
/// counter once per pass while its body only touches cells to the right.
fn terminating() -> impl Strategy<Value = String> {
    let leaf = prop::collection::vec(prop::sample::select(vec!['+', '-', '.', ',']), 0..6)
        .prop_map(|v| v.into_iter().collect::<String>());
    leaf.prop_recursive(2, 24, 3, |inner| {
        prop::collection::vec(
            prop_oneof![
                inner.clone(),
                inner.clone().prop_map(|s| format!(">{s}<")),
                inner.prop_map(|s| format!("[->{s}<]")),
            ],
            0..4,
        )
        .prop_map(|parts| parts.concat())
    })
}

fn eof_policy() -> impl Strategy<Value = EofPolicy> {
    prop_oneof![Just(EofPolicy::Unchanged), any::<u8>().prop_map(EofPolicy::Sentinel)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// The compiled C program and the interpreter print the same bytes.
    #[test]
    fn generated_programs_agree(
        src in terminating(),
        input in prop::collection::vec(any::<u8>(), 0..6),
        eof in eof_policy(),
    ) {
        let Some(cc) = c_compiler() else {
            return Ok(());
        };
        let config = EngineConfig { eof, ..EngineConfig::default() };
        let dir = tempfile::tempdir().unwrap();
        let exe = compile(&cc, dir.path(), &src, &config);
        let compiled = run_compiled(&exe, &input);
        let interpreted = interpret(&src, &input, &config);
        prop_assert_eq!(compiled, interpreted, "outputs differ for program {:?}", src);
    }
}
