//! The `verso` registrar global exposed to hook scripts.
//!
//! Scripts observe the run through read-only fields and influence it through
//! the registration operations:
//! - `verso.definition` - the requested definition, as given by the caller
//! - `verso.version` - the verso version
//! - `verso.register_before(fn)` - append a before-phase callback
//! - `verso.register_after(fn)` - append an after-phase callback
//! - `verso.set_version_name(name)` - override the derived version name

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use mlua::prelude::*;

use super::{Hook, HookState};

/// Register the `verso` global table in the Lua runtime.
pub(super) fn register_globals(lua: &Lua, definition: &str, state: Rc<RefCell<HookState>>) -> LuaResult<()> {
  let verso = lua.create_table()?;

  verso.set("definition", definition)?;
  verso.set("version", env!("CARGO_PKG_VERSION"))?;

  let register_state = Rc::clone(&state);
  let register_before = lua.create_function(move |_, func: LuaFunction| {
    let mut state = register_state.borrow_mut();
    let source = current_script(&state);
    state.before.push(Hook { callback: func, source });
    Ok(())
  })?;
  verso.set("register_before", register_before)?;

  let register_state = Rc::clone(&state);
  let register_after = lua.create_function(move |_, func: LuaFunction| {
    let mut state = register_state.borrow_mut();
    let source = current_script(&state);
    state.after.push(Hook { callback: func, source });
    Ok(())
  })?;
  verso.set("register_after", register_after)?;

  let name_state = Rc::clone(&state);
  let set_version_name = lua.create_function(move |_, name: String| {
    let name = name.trim().to_string();
    if name.is_empty() {
      return Err(LuaError::external("version name must not be empty"));
    }
    name_state.borrow_mut().version_name = Some(name);
    Ok(())
  })?;
  verso.set("set_version_name", set_version_name)?;

  lua.globals().set("verso", verso)?;
  Ok(())
}

fn current_script(state: &HookState) -> PathBuf {
  state.current_script.clone().unwrap_or_else(|| PathBuf::from("<inline>"))
}
