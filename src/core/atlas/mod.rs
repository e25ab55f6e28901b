//! Purpose: Safe wrappers around the Atlas engine's session, module, and
//! virtual-file entry points.
//! Exports: `Handle`, `PsMode`, and the `pub(crate)` call surface used by
//! `Session`, `VirtualVectors`, and `Figure`.
//! Role: The only FFI boundary in the crate.
//! Invariants: All `unsafe` interaction with the engine is confined to this
//! module + `sys`.
//! Invariants: `Handle` releases the engine session exactly once, on drop.
use std::ffi::{CStr, CString};
use std::io;
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr::NonNull;

use crate::core::error::{Error, ErrorKind};

pub mod sys;

const VFILE_NAME_CAP: usize = 32;
const DEFAULT_VALUE_CAP: usize = 128;

/// Owning handle to one engine session. Move-only; the engine pointer is
/// released exactly once when the handle drops.
pub(crate) struct Handle {
    raw: NonNull<sys::AtlasSession>,
}

impl Handle {
    fn as_ptr(&self) -> *mut sys::AtlasSession {
        self.raw.as_ptr()
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        unsafe { sys::terraplot_atlas_destroy(self.raw.as_ptr()) };
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle").finish_non_exhaustive()
    }
}

/// Continuation mode threaded through every drawing call. The three
/// combinations are the entire artifact state contract: a fresh artifact
/// with more to follow, a continuation with more to follow, or the
/// terminating call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PsMode {
    Open,
    Continue,
    Terminate,
}

impl PsMode {
    fn bits(self) -> u32 {
        match self {
            PsMode::Open => 0,
            PsMode::Continue => sys::ATLAS_PS_CONTINUE,
            PsMode::Terminate => sys::ATLAS_PS_CONTINUE | sys::ATLAS_PS_TERMINATE,
        }
    }
}

pub(crate) fn version() -> &'static str {
    let raw = unsafe { CStr::from_ptr(sys::terraplot_atlas_version()) };
    raw.to_str().unwrap_or("unknown")
}

pub(crate) fn create(datadir: Option<&Path>) -> Result<Handle, Error> {
    let datadir_cstr = match datadir {
        Some(dir) => Some(path_cstring(dir)?),
        None => None,
    };
    let datadir_ptr = datadir_cstr
        .as_ref()
        .map_or(std::ptr::null(), |dir| dir.as_ptr());

    let mut raw: *mut sys::AtlasSession = std::ptr::null_mut();
    let code = unsafe { sys::terraplot_atlas_create(datadir_ptr, &mut raw) };
    if code != sys::ATLAS_OK {
        let err = match code {
            sys::ATLAS_ERR_DATADIR => {
                let mut err =
                    Error::new(ErrorKind::Init).with_message("engine data directory not found");
                if let Some(dir) = datadir {
                    err = err.with_path(dir);
                }
                err
            }
            sys::ATLAS_ERR_NOMEM => {
                Error::new(ErrorKind::Init).with_message("engine session allocation failed")
            }
            _ => Error::new(ErrorKind::Internal)
                .with_message("engine session creation failed")
                .with_code(code),
        };
        return Err(err);
    }

    let raw = NonNull::new(raw).ok_or_else(|| {
        Error::new(ErrorKind::Internal).with_message("engine returned a null session")
    })?;
    Ok(Handle { raw })
}

pub(crate) fn last_error(handle: &Handle) -> String {
    let raw = unsafe { sys::terraplot_atlas_last_error(handle.as_ptr()) };
    if raw.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned()
}

pub(crate) fn call_module(
    handle: &Handle,
    name: &str,
    args: &str,
    artifact: Option<(&Path, PsMode)>,
) -> Result<(), Error> {
    tracing::debug!(module = name, mode = ?artifact.map(|(_, mode)| mode), "dispatching module");

    let name_cstr = token_cstring(name)?;
    let args_cstr = token_cstring(args)?;
    let artifact_cstr = match artifact {
        Some((path, _)) => Some(path_cstring(path)?),
        None => None,
    };
    let artifact_ptr = artifact_cstr
        .as_ref()
        .map_or(std::ptr::null(), |path| path.as_ptr());
    let mode_bits = artifact.map_or(0, |(_, mode)| mode.bits());

    let code = unsafe {
        sys::terraplot_atlas_call_module(
            handle.as_ptr(),
            name_cstr.as_ptr(),
            args_cstr.as_ptr(),
            mode_bits,
            artifact_ptr,
        )
    };
    if code == sys::ATLAS_OK {
        return Ok(());
    }

    let err = Error::new(ErrorKind::Module)
        .with_message(last_error(handle))
        .with_module(name)
        .with_code(code);
    if code == sys::ATLAS_ERR_IO {
        let os = io::Error::last_os_error();
        let mut err = err;
        if os.raw_os_error() == Some(libc::ENOENT)
            && let Some((path, _)) = artifact
        {
            err = err.with_path(path);
        }
        return Err(err.with_source(os));
    }
    Err(err)
}

pub(crate) fn get_default(handle: &Handle, key: &str) -> Result<Option<String>, Error> {
    let key_cstr = token_cstring(key)?;
    let mut buf = [0 as c_char; DEFAULT_VALUE_CAP];
    let code = unsafe {
        sys::terraplot_atlas_get_default(handle.as_ptr(), key_cstr.as_ptr(), buf.as_mut_ptr(), buf.len())
    };
    match code {
        sys::ATLAS_OK => {
            let value = unsafe { CStr::from_ptr(buf.as_ptr()) };
            Ok(Some(value.to_string_lossy().into_owned()))
        }
        sys::ATLAS_ERR_NOT_FOUND => Ok(None),
        _ => Err(engine_error(handle, code)),
    }
}

pub(crate) fn vectors_create(handle: &Handle, ncols: usize, nrows: usize) -> Result<c_int, Error> {
    let mut id: c_int = -1;
    let code = unsafe { sys::terraplot_atlas_vectors_create(handle.as_ptr(), ncols, nrows, &mut id) };
    if code != sys::ATLAS_OK {
        return Err(engine_error(handle, code));
    }
    Ok(id)
}

pub(crate) fn vectors_attach(
    handle: &Handle,
    id: c_int,
    col: usize,
    values: &[f64],
) -> Result<(), Error> {
    let code = unsafe {
        sys::terraplot_atlas_vectors_attach(handle.as_ptr(), id, col, values.as_ptr())
    };
    if code != sys::ATLAS_OK {
        return Err(engine_error(handle, code));
    }
    Ok(())
}

pub(crate) fn vectors_destroy(handle: &Handle, id: c_int) -> Result<(), Error> {
    let code = unsafe { sys::terraplot_atlas_vectors_destroy(handle.as_ptr(), id) };
    if code != sys::ATLAS_OK {
        return Err(engine_error(handle, code));
    }
    Ok(())
}

pub(crate) fn vfile_open(handle: &Handle, container_id: c_int) -> Result<String, Error> {
    let mut buf = [0 as c_char; VFILE_NAME_CAP];
    let code = unsafe {
        sys::terraplot_atlas_vfile_open(handle.as_ptr(), container_id, buf.as_mut_ptr(), buf.len())
    };
    if code != sys::ATLAS_OK {
        return Err(engine_error(handle, code));
    }
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Ok(name.to_string_lossy().into_owned())
}

pub(crate) fn vfile_close(handle: &Handle, name: &str) -> Result<(), Error> {
    let name_cstr = token_cstring(name)?;
    let code = unsafe { sys::terraplot_atlas_vfile_close(handle.as_ptr(), name_cstr.as_ptr()) };
    if code != sys::ATLAS_OK {
        return Err(engine_error(handle, code));
    }
    Ok(())
}

pub(crate) fn vfile_count(handle: &Handle) -> usize {
    let count = unsafe { sys::terraplot_atlas_vfile_count(handle.as_ptr()) };
    count.max(0) as usize
}

fn engine_error(handle: &Handle, code: c_int) -> Error {
    let kind = match code {
        sys::ATLAS_ERR_NOT_FOUND => ErrorKind::NotFound,
        sys::ATLAS_ERR_USAGE | sys::ATLAS_ERR_LIMIT => ErrorKind::Usage,
        sys::ATLAS_ERR_IO => ErrorKind::Io,
        _ => ErrorKind::Internal,
    };
    Error::new(kind)
        .with_message(last_error(handle))
        .with_code(code)
}

fn token_cstring(value: &str) -> Result<CString, Error> {
    CString::new(value).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("argument contains a NUL byte")
            .with_source(err)
    })
}

fn path_cstring(path: &Path) -> Result<CString, Error> {
    let text = path.to_str().ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message("path is not valid UTF-8")
            .with_path(path)
    })?;
    CString::new(text).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("path contains a NUL byte")
            .with_path(path)
            .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use super::{PsMode, create, vectors_attach, vectors_create, vectors_destroy, vfile_close, vfile_count, vfile_open};
    use crate::core::error::ErrorKind;

    #[test]
    fn create_and_drop_session() {
        let handle = create(None).expect("create");
        assert_eq!(vfile_count(&handle), 0);
    }

    #[test]
    fn missing_datadir_fails_init() {
        let err = create(Some(std::path::Path::new("/no/such/terraplot/share")))
            .expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Init);
    }

    #[test]
    fn vfile_round_trip_frees_the_slot() {
        let handle = create(None).expect("create");
        let xs = [0.0, 1.0, 2.0];
        let ys = [10.0, 11.0, 12.0];

        let id = vectors_create(&handle, 2, 3).expect("container");
        vectors_attach(&handle, id, 0, &xs).expect("attach x");
        vectors_attach(&handle, id, 1, &ys).expect("attach y");
        let name = vfile_open(&handle, id).expect("open");
        assert!(name.starts_with("@avec_"));
        assert_eq!(vfile_count(&handle), 1);

        vfile_close(&handle, &name).expect("close");
        vectors_destroy(&handle, id).expect("destroy");
        assert_eq!(vfile_count(&handle), 0);
    }

    #[test]
    fn destroying_a_referenced_container_is_rejected() {
        let handle = create(None).expect("create");
        let xs = [1.0];
        let id = vectors_create(&handle, 1, 1).expect("container");
        vectors_attach(&handle, id, 0, &xs).expect("attach");
        let name = vfile_open(&handle, id).expect("open");

        let err = vectors_destroy(&handle, id).expect_err("still referenced");
        assert_eq!(err.kind(), ErrorKind::Usage);

        vfile_close(&handle, &name).expect("close");
        vectors_destroy(&handle, id).expect("destroy");
    }

    #[test]
    fn modes_map_to_expected_bits() {
        assert_eq!(PsMode::Open.bits(), 0);
        assert_eq!(PsMode::Continue.bits(), super::sys::ATLAS_PS_CONTINUE);
        assert_eq!(
            PsMode::Terminate.bits(),
            super::sys::ATLAS_PS_CONTINUE | super::sys::ATLAS_PS_TERMINATE
        );
    }
}
