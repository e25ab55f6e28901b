// Raw FFI bindings to the in-tree Atlas engine.
use std::os::raw::{c_char, c_double, c_int, c_uint};

pub const ATLAS_PS_CONTINUE: c_uint = 0x1;
pub const ATLAS_PS_TERMINATE: c_uint = 0x2;

pub const ATLAS_OK: c_int = 0;
pub const ATLAS_ERR_NOMEM: c_int = -1;
pub const ATLAS_ERR_DATADIR: c_int = -2;
pub const ATLAS_ERR_USAGE: c_int = -3;
pub const ATLAS_ERR_NO_MODULE: c_int = -4;
pub const ATLAS_ERR_MODULE: c_int = -5;
pub const ATLAS_ERR_LIMIT: c_int = -6;
pub const ATLAS_ERR_IO: c_int = -7;
pub const ATLAS_ERR_NOT_FOUND: c_int = -8;

/// Opaque engine session; only ever handled behind a pointer.
#[repr(C)]
pub struct AtlasSession {
    _private: [u8; 0],
}

unsafe extern "C" {
    pub fn terraplot_atlas_version() -> *const c_char;

    pub fn terraplot_atlas_create(
        datadir: *const c_char,
        out: *mut *mut AtlasSession,
    ) -> c_int;

    pub fn terraplot_atlas_destroy(session: *mut AtlasSession);

    pub fn terraplot_atlas_last_error(session: *const AtlasSession) -> *const c_char;

    pub fn terraplot_atlas_call_module(
        session: *mut AtlasSession,
        name: *const c_char,
        args: *const c_char,
        ps_mode: c_uint,
        artifact: *const c_char,
    ) -> c_int;

    pub fn terraplot_atlas_get_default(
        session: *mut AtlasSession,
        key: *const c_char,
        out: *mut c_char,
        cap: usize,
    ) -> c_int;

    pub fn terraplot_atlas_vectors_create(
        session: *mut AtlasSession,
        ncols: usize,
        nrows: usize,
        out_id: *mut c_int,
    ) -> c_int;

    pub fn terraplot_atlas_vectors_attach(
        session: *mut AtlasSession,
        id: c_int,
        col: usize,
        values: *const c_double,
    ) -> c_int;

    pub fn terraplot_atlas_vectors_destroy(session: *mut AtlasSession, id: c_int) -> c_int;

    pub fn terraplot_atlas_vfile_open(
        session: *mut AtlasSession,
        container_id: c_int,
        name_out: *mut c_char,
        name_cap: usize,
    ) -> c_int;

    pub fn terraplot_atlas_vfile_close(session: *mut AtlasSession, name: *const c_char) -> c_int;

    pub fn terraplot_atlas_vfile_count(session: *const AtlasSession) -> c_int;
}
