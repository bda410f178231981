/*!
Subcommand modules of `acmd`.

  src/cmd/
    mod.rs      (this file: declarations + re-exports)
    subject.rs  (Subject enum for `list`)
    list.rs     (ListArgs + execute_list)
    get.rs      (GetArgs  + execute_get)
    exec.rs     (ExecArgs + execute_exec)
    shared.rs   (Settings, command loading, output_error)
    format.rs   (box / table / color helpers for human output)

Each subcommand module exposes one `execute_*` function taking its args and
the resolved `Settings`, returning `anyhow::Result<()>`.
*/

pub mod exec;
pub mod format;
pub mod get;
pub mod list;
pub mod shared;
pub mod subject;

pub use exec::{ExecArgs, execute_exec};
pub use get::{GetArgs, execute_get};
pub use list::{ListArgs, execute_list};
pub use shared::Settings;
