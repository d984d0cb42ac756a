use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bf::cli::{self, CliArgs, Mode};
use bf::{execute, validate, EngineConfig, Program, Transpiler};

fn main() -> ExitCode {
    let args = cli::parse_args();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bf: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = args.engine_config().context("cannot load configuration")?;
    log::debug!("effective config: {config:?}");

    match args.mode() {
        Mode::Stdin => run_stdin(&config),
        Mode::File(path) => run_file(&path, &config),
        Mode::Convert { input, output } => convert(&input, &output, &config),
    }
}

// ── Execution ─────────────────────────────────────────────────────────────────

/// Read the whole program from stdin, then execute it.  Any stdin left after
/// the program is what `,` sees (usually nothing).
fn run_stdin(config: &EngineConfig) -> Result<()> {
    let is_tty = unsafe { libc::isatty(libc::STDIN_FILENO) != 0 };
    if is_tty {
        eprintln!("bf: reading program from stdin; finish with Ctrl-D");
    }
    let stdin = io::stdin();
    let program = Program::from_reader(stdin.lock(), config).context("cannot read program from stdin")?;
    exec(&program, config)
}

fn run_file(path: &Path, config: &EngineConfig) -> Result<()> {
    let program = Program::load_file(path, config)
        .with_context(|| format!("cannot read {}", path.display()))?;
    exec(&program, config)
}

fn exec(program: &Program, config: &EngineConfig) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = io::BufWriter::new(stdout.lock());
    execute(program, config, &mut input, &mut output)?;
    Ok(())
}

// ── Conversion ────────────────────────────────────────────────────────────────

/// Transpile `input` to C.  The source is validated first so that an
/// unbalanced program never leaves a broken C file behind.
fn convert(input: &Path, output: &Path, config: &EngineConfig) -> Result<()> {
    let program = Program::load_file(input, config)
        .with_context(|| format!("cannot read {}", input.display()))?;
    validate(&program).with_context(|| format!("cannot convert {}", input.display()))?;

    let transpiler = Transpiler::new(config);

    if cli::is_stdout(output) {
        let stdout = io::stdout();
        transpiler
            .transpile(program.as_bytes(), stdout.lock())
            .context("cannot write C code to stdout")?;
        return Ok(());
    }

    // Write beside the target and rename into place, so a failed conversion
    // never truncates an existing file.
    let dir = match output.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create {}", output.display()))?;
    set_output_permissions(tmp.as_file(), output)
        .with_context(|| format!("cannot set permissions on {}", output.display()))?;
    transpiler
        .transpile(program.as_bytes(), io::BufWriter::new(tmp.as_file_mut()))
        .with_context(|| format!("cannot write {}", output.display()))?;
    tmp.persist(output)
        .with_context(|| format!("cannot write {}", output.display()))?;

    log::info!("converted {} -> {}", input.display(), output.display());
    let mut stdout = io::stdout();
    writeln!(stdout, "Brainfuck code converted to C code in {}", output.display())?;
    Ok(())
}

/// The temporary file is created 0600.  Give it the mode of the file it
/// replaces, or what a plain create would get under the current umask.
#[cfg(unix)]
fn set_output_permissions(file: &std::fs::File, output: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let perms = match std::fs::metadata(output) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // umask can only be read by setting it; put it straight back.
            let mask = unsafe {
                let mask = libc::umask(0);
                libc::umask(mask);
                mask
            };
            std::fs::Permissions::from_mode(0o666 & !(mask as u32))
        }
        Err(e) => return Err(e),
    };
    file.set_permissions(perms)
}

#[cfg(not(unix))]
fn set_output_permissions(_file: &std::fs::File, _output: &Path) -> io::Result<()> {
    Ok(())
}
