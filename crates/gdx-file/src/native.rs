//! Bindings to the GDX C library (`gdxcclib64`).
//!
//! Only this module declares GDX FFI. All calls go through [`NativeGdx`],
//! which owns one library handle and frees it on drop.
//!
//! # Safety
//!
//! Every string passed to the library is NUL-terminated, and every buffer
//! the library fills is [`GMS_SSSIZE`] bytes, as the C API requires.

#![allow(unsafe_code)]

use std::ffi::{CString, c_char, c_double, c_int};
use std::fmt;
use std::path::Path;
use std::ptr::{self, NonNull};

use gdx_model::special::SV_COUNT;

use crate::api::{
    ApiResult, GMS_MAX_INDEX_DIM, GMS_SSSIZE, GMS_VAL_MAX, GdxApi, LibraryError, RawRecord,
    RecordValues, SymbolInfo, SymbolType,
};
use crate::error::{GdxError, Result};
use crate::file::GdxFile;
use crate::options::{GdxOptions, OpenMode};

/// Error number used when the library cannot be loaded.
pub const ERR_LOAD: i32 = -1;
/// Error number used for strings with interior NUL bytes.
pub const ERR_STRING: i32 = -2;
/// Error number used for a type code the bindings do not know.
pub const ERR_TYPE: i32 = -3;
/// Error number used for counts that do not fit a C `int`.
pub const ERR_RANGE: i32 = -4;

/// Opaque library handle.
#[repr(C)]
pub struct GdxRec {
    _private: [u8; 0],
}

type StrBuf = [c_char; GMS_SSSIZE];

#[link(name = "gdxcclib64")]
unsafe extern "C" {
    fn gdxCreate(pgdx: *mut *mut GdxRec, msg_buf: *mut c_char, msg_buf_size: c_int) -> c_int;
    fn gdxCreateD(
        pgdx: *mut *mut GdxRec,
        dir_name: *const c_char,
        msg_buf: *mut c_char,
        msg_buf_size: c_int,
    ) -> c_int;
    fn gdxFree(pgdx: *mut *mut GdxRec) -> c_int;

    fn gdxOpenRead(pgdx: *mut GdxRec, file_name: *const c_char, err_nr: *mut c_int) -> c_int;
    fn gdxOpenWrite(
        pgdx: *mut GdxRec,
        file_name: *const c_char,
        producer: *const c_char,
        err_nr: *mut c_int,
    ) -> c_int;
    fn gdxOpenAppend(
        pgdx: *mut GdxRec,
        file_name: *const c_char,
        producer: *const c_char,
        err_nr: *mut c_int,
    ) -> c_int;
    fn gdxClose(pgdx: *mut GdxRec) -> c_int;

    fn gdxGetLastError(pgdx: *mut GdxRec) -> c_int;
    fn gdxErrorStr(pgdx: *mut GdxRec, err_nr: c_int, err_msg: *mut c_char) -> c_int;
    fn gdxSetSpecialValues(pgdx: *mut GdxRec, a_vals: *const c_double) -> c_int;

    fn gdxSystemInfo(pgdx: *mut GdxRec, sy_cnt: *mut c_int, uel_cnt: *mut c_int) -> c_int;
    fn gdxSymbolInfo(
        pgdx: *mut GdxRec,
        sy_nr: c_int,
        sy_id: *mut c_char,
        dim: *mut c_int,
        typ: *mut c_int,
    ) -> c_int;
    fn gdxSymbolInfoX(
        pgdx: *mut GdxRec,
        sy_nr: c_int,
        rec_cnt: *mut c_int,
        user_info: *mut c_int,
        expl_txt: *mut c_char,
    ) -> c_int;
    fn gdxFindSymbol(pgdx: *mut GdxRec, sy_id: *const c_char, sy_nr: *mut c_int) -> c_int;
    fn gdxSymbolGetDomainX(pgdx: *mut GdxRec, sy_nr: c_int, domain_ids: *mut *mut c_char)
    -> c_int;
    fn gdxSymbolSetDomainX(
        pgdx: *mut GdxRec,
        sy_nr: c_int,
        domain_ids: *const *const c_char,
    ) -> c_int;

    fn gdxDataReadStrStart(pgdx: *mut GdxRec, sy_nr: c_int, nr_recs: *mut c_int) -> c_int;
    fn gdxDataReadStr(
        pgdx: *mut GdxRec,
        key_str: *mut *mut c_char,
        values: *mut c_double,
        dim_frst: *mut c_int,
    ) -> c_int;
    fn gdxDataReadDone(pgdx: *mut GdxRec) -> c_int;
    fn gdxGetElemText(pgdx: *mut GdxRec, txt_nr: c_int, txt: *mut c_char, node: *mut c_int)
    -> c_int;

    fn gdxDataWriteStrStart(
        pgdx: *mut GdxRec,
        sy_id: *const c_char,
        expl_txt: *const c_char,
        dim: c_int,
        typ: c_int,
        user_info: c_int,
    ) -> c_int;
    fn gdxDataWriteStr(
        pgdx: *mut GdxRec,
        key_str: *const *const c_char,
        values: *const c_double,
    ) -> c_int;
    fn gdxDataWriteDone(pgdx: *mut GdxRec) -> c_int;
    fn gdxAddSetText(pgdx: *mut GdxRec, txt: *const c_char, txt_nr: *mut c_int) -> c_int;
}

/// A handle on the native GDX library.
pub struct NativeGdx {
    handle: NonNull<GdxRec>,
    /// Dimension of the symbol being read.
    read_dimension: usize,
}

// SAFETY: the handle is only used through &mut self or &self on one thread
// at a time; the library keeps no thread-local state per handle.
unsafe impl Send for NativeGdx {}

impl NativeGdx {
    /// Load the library, from `gams_dir` when given.
    pub fn new(gams_dir: Option<&Path>) -> ApiResult<Self> {
        let mut raw: *mut GdxRec = ptr::null_mut();
        let mut msg: StrBuf = [0; GMS_SSSIZE];
        let created = match gams_dir {
            Some(dir) => {
                let dir = c_string(&dir.to_string_lossy())?;
                // SAFETY: valid output pointer, NUL-terminated directory and
                // a message buffer of the declared size.
                unsafe { gdxCreateD(&mut raw, dir.as_ptr(), msg.as_mut_ptr(), buf_len()) }
            }
            // SAFETY: valid output pointer and message buffer.
            None => unsafe { gdxCreate(&mut raw, msg.as_mut_ptr(), buf_len()) },
        };
        match NonNull::new(raw) {
            Some(handle) if created != 0 => Ok(Self {
                handle,
                read_dimension: 0,
            }),
            _ => Err(LibraryError::new(ERR_LOAD, from_buf(&msg))),
        }
    }

    /// Load the library as configured in `options`.
    pub fn from_options(options: &GdxOptions) -> ApiResult<Self> {
        Self::new(options.gams_dir.as_deref())
    }

    fn raw(&self) -> *mut GdxRec {
        self.handle.as_ptr()
    }

    fn error(&self, code: c_int) -> LibraryError {
        let mut msg: StrBuf = [0; GMS_SSSIZE];
        // SAFETY: live handle and a buffer of GMS_SSSIZE bytes.
        unsafe { gdxErrorStr(self.raw(), code, msg.as_mut_ptr()) };
        LibraryError::new(code, from_buf(&msg))
    }

    fn last_error(&self) -> LibraryError {
        // SAFETY: live handle.
        let code = unsafe { gdxGetLastError(self.raw()) };
        self.error(code)
    }

    fn check(&self, ret: c_int) -> ApiResult<()> {
        if ret == 0 {
            Err(self.last_error())
        } else {
            Ok(())
        }
    }

    fn open_result(&self, ret: c_int, err_nr: c_int) -> ApiResult<()> {
        if ret == 0 {
            Err(self.error(err_nr))
        } else {
            Ok(())
        }
    }
}

impl GdxApi for NativeGdx {
    fn open_read(&mut self, path: &Path) -> ApiResult<()> {
        let name = c_string(&path.to_string_lossy())?;
        let mut err_nr = 0;
        // SAFETY: live handle, NUL-terminated name, valid output pointer.
        let ret = unsafe { gdxOpenRead(self.raw(), name.as_ptr(), &mut err_nr) };
        self.open_result(ret, err_nr)
    }

    fn open_write(&mut self, path: &Path, producer: &str) -> ApiResult<()> {
        let name = c_string(&path.to_string_lossy())?;
        let producer = c_string(producer)?;
        let mut err_nr = 0;
        // SAFETY: live handle, NUL-terminated strings, valid output pointer.
        let ret =
            unsafe { gdxOpenWrite(self.raw(), name.as_ptr(), producer.as_ptr(), &mut err_nr) };
        self.open_result(ret, err_nr)
    }

    fn open_append(&mut self, path: &Path, producer: &str) -> ApiResult<()> {
        let name = c_string(&path.to_string_lossy())?;
        let producer = c_string(producer)?;
        let mut err_nr = 0;
        // SAFETY: live handle, NUL-terminated strings, valid output pointer.
        let ret =
            unsafe { gdxOpenAppend(self.raw(), name.as_ptr(), producer.as_ptr(), &mut err_nr) };
        self.open_result(ret, err_nr)
    }

    fn close(&mut self) -> ApiResult<()> {
        // gdxClose returns the last error number, zero on success.
        // SAFETY: live handle.
        let code = unsafe { gdxClose(self.raw()) };
        if code == 0 {
            Ok(())
        } else {
            Err(self.error(code))
        }
    }

    fn set_special_values(&mut self, values: &[f64; SV_COUNT]) -> ApiResult<()> {
        // SAFETY: live handle and an array of the length the library reads.
        let ret = unsafe { gdxSetSpecialValues(self.raw(), values.as_ptr()) };
        self.check(ret)
    }

    fn symbol_count(&self) -> ApiResult<usize> {
        let (mut symbols, mut uels) = (0, 0);
        // SAFETY: live handle, valid output pointers.
        let ret = unsafe { gdxSystemInfo(self.raw(), &mut symbols, &mut uels) };
        self.check(ret)?;
        Ok(to_usize(symbols))
    }

    fn symbol_info(&self, number: usize) -> ApiResult<SymbolInfo> {
        let sy_nr = to_c_int(number)?;
        let mut name: StrBuf = [0; GMS_SSSIZE];
        let mut text: StrBuf = [0; GMS_SSSIZE];
        let (mut dim, mut typ, mut records, mut user_info) = (0, 0, 0, 0);
        // SAFETY: live handle, buffers of GMS_SSSIZE bytes, valid output pointers.
        let ret =
            unsafe { gdxSymbolInfo(self.raw(), sy_nr, name.as_mut_ptr(), &mut dim, &mut typ) };
        self.check(ret)?;
        // SAFETY: as above.
        let ret = unsafe {
            gdxSymbolInfoX(
                self.raw(),
                sy_nr,
                &mut records,
                &mut user_info,
                text.as_mut_ptr(),
            )
        };
        self.check(ret)?;
        let symbol_type = SymbolType::from_code(typ)
            .ok_or_else(|| LibraryError::new(ERR_TYPE, format!("unknown symbol type {typ}")))?;
        Ok(SymbolInfo {
            name: from_buf(&name),
            dimension: to_usize(dim),
            symbol_type,
            records: to_usize(records),
            user_info,
            expl_text: from_buf(&text),
        })
    }

    fn find_symbol(&self, name: &str) -> ApiResult<Option<usize>> {
        let name = c_string(name)?;
        let mut sy_nr = 0;
        // SAFETY: live handle, NUL-terminated name, valid output pointer.
        let found = unsafe { gdxFindSymbol(self.raw(), name.as_ptr(), &mut sy_nr) };
        // The universe `*` is found as number 0.
        Ok((found != 0 && sy_nr > 0).then(|| to_usize(sy_nr)))
    }

    fn symbol_domain(&self, number: usize) -> ApiResult<Vec<String>> {
        let dimension = self.symbol_info(number)?.dimension;
        let mut bufs = [[0 as c_char; GMS_SSSIZE]; GMS_MAX_INDEX_DIM];
        let mut ptrs = key_pointers(&mut bufs);
        let sy_nr = to_c_int(number)?;
        // SAFETY: live handle and one GMS_SSSIZE buffer per possible dimension.
        let ret = unsafe { gdxSymbolGetDomainX(self.raw(), sy_nr, ptrs.as_mut_ptr()) };
        self.check(ret)?;
        Ok(bufs[..dimension].iter().map(|buf| from_buf(buf)).collect())
    }

    fn read_start(&mut self, number: usize) -> ApiResult<usize> {
        self.read_dimension = self.symbol_info(number)?.dimension;
        let sy_nr = to_c_int(number)?;
        let mut records = 0;
        // SAFETY: live handle, valid output pointer.
        let ret = unsafe { gdxDataReadStrStart(self.raw(), sy_nr, &mut records) };
        self.check(ret)?;
        Ok(to_usize(records))
    }

    fn read_record(&mut self) -> ApiResult<Option<RawRecord>> {
        let mut bufs = [[0 as c_char; GMS_SSSIZE]; GMS_MAX_INDEX_DIM];
        let mut ptrs = key_pointers(&mut bufs);
        let mut values: RecordValues = [0.0; GMS_VAL_MAX];
        let mut dim_first = 0;
        // SAFETY: live handle, one key buffer per possible dimension and a
        // value array of GMS_VAL_MAX entries.
        let ret = unsafe {
            gdxDataReadStr(
                self.raw(),
                ptrs.as_mut_ptr(),
                values.as_mut_ptr(),
                &mut dim_first,
            )
        };
        if ret == 0 {
            return Ok(None);
        }
        let keys = bufs[..self.read_dimension]
            .iter()
            .map(|buf| from_buf(buf))
            .collect();
        Ok(Some(RawRecord { keys, values }))
    }

    fn read_done(&mut self) -> ApiResult<()> {
        // SAFETY: live handle.
        let ret = unsafe { gdxDataReadDone(self.raw()) };
        self.check(ret)
    }

    fn element_text(&self, index: i32) -> ApiResult<Option<String>> {
        let mut text: StrBuf = [0; GMS_SSSIZE];
        let mut node = 0;
        // SAFETY: live handle, buffer of GMS_SSSIZE bytes, valid output pointer.
        let ret = unsafe { gdxGetElemText(self.raw(), index, text.as_mut_ptr(), &mut node) };
        Ok((ret != 0).then(|| from_buf(&text)))
    }

    fn write_start(
        &mut self,
        name: &str,
        expl_text: &str,
        dimension: usize,
        symbol_type: SymbolType,
        user_info: i32,
    ) -> ApiResult<()> {
        let name = c_string(name)?;
        let text = c_string(expl_text)?;
        // SAFETY: live handle and NUL-terminated strings.
        let ret = unsafe {
            gdxDataWriteStrStart(
                self.raw(),
                name.as_ptr(),
                text.as_ptr(),
                to_c_int(dimension)?,
                symbol_type.code(),
                user_info,
            )
        };
        self.check(ret)
    }

    fn set_symbol_domain(&mut self, number: usize, domain: &[String]) -> ApiResult<()> {
        let owned = domain
            .iter()
            .map(|set| c_string(set))
            .collect::<ApiResult<Vec<_>>>()?;
        let ptrs: Vec<*const c_char> = owned.iter().map(|s| s.as_ptr()).collect();
        let sy_nr = to_c_int(number)?;
        // SAFETY: live handle and one NUL-terminated string per dimension,
        // kept alive by `owned` for the duration of the call.
        let ret = unsafe { gdxSymbolSetDomainX(self.raw(), sy_nr, ptrs.as_ptr()) };
        self.check(ret)
    }

    fn write_record(&mut self, keys: &[String], values: &RecordValues) -> ApiResult<()> {
        let owned = keys
            .iter()
            .map(|key| c_string(key))
            .collect::<ApiResult<Vec<_>>>()?;
        let ptrs: Vec<*const c_char> = owned.iter().map(|s| s.as_ptr()).collect();
        // SAFETY: live handle, one NUL-terminated label per dimension and a
        // value array of GMS_VAL_MAX entries.
        let ret = unsafe { gdxDataWriteStr(self.raw(), ptrs.as_ptr(), values.as_ptr()) };
        self.check(ret)
    }

    fn write_done(&mut self) -> ApiResult<()> {
        // SAFETY: live handle.
        let ret = unsafe { gdxDataWriteDone(self.raw()) };
        self.check(ret)
    }

    fn add_set_text(&mut self, text: &str) -> ApiResult<i32> {
        let text = c_string(text)?;
        let mut txt_nr = 0;
        // SAFETY: live handle, NUL-terminated text, valid output pointer.
        let ret = unsafe { gdxAddSetText(self.raw(), text.as_ptr(), &mut txt_nr) };
        self.check(ret)?;
        Ok(txt_nr)
    }
}

impl Drop for NativeGdx {
    fn drop(&mut self) {
        let mut raw = self.handle.as_ptr();
        // SAFETY: the handle came from gdxCreate or gdxCreateD and is freed once.
        unsafe {
            gdxFree(&mut raw);
        }
    }
}

impl fmt::Debug for NativeGdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeGdx")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Open a container through the native library.
pub fn open(
    path: impl AsRef<Path>,
    mode: OpenMode,
    options: GdxOptions,
) -> Result<GdxFile<NativeGdx>> {
    let api =
        NativeGdx::from_options(&options).map_err(|err| GdxError::library("create", err))?;
    GdxFile::open_with(api, path, mode, options)
}

fn c_string(value: &str) -> ApiResult<CString> {
    CString::new(value)
        .map_err(|_| LibraryError::new(ERR_STRING, format!("string contains NUL: {value:?}")))
}

fn from_buf(buf: &[c_char]) -> String {
    #[allow(clippy::cast_sign_loss)]
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn key_pointers(bufs: &mut [StrBuf; GMS_MAX_INDEX_DIM]) -> [*mut c_char; GMS_MAX_INDEX_DIM] {
    let mut ptrs = [ptr::null_mut(); GMS_MAX_INDEX_DIM];
    for (slot, buf) in ptrs.iter_mut().zip(bufs.iter_mut()) {
        *slot = buf.as_mut_ptr();
    }
    ptrs
}

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const fn buf_len() -> c_int {
    GMS_SSSIZE as c_int
}

fn to_c_int(value: usize) -> ApiResult<c_int> {
    c_int::try_from(value)
        .map_err(|_| LibraryError::new(ERR_RANGE, format!("{value} does not fit a C int")))
}

fn to_usize(value: c_int) -> usize {
    usize::try_from(value).unwrap_or_default()
}
