//! host bridge exposing the filesystem through fuse. inodes are handed out
//! once at mount time since the tree never changes afterwards

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, SystemTime};

use fuser::{FileAttr, FileType, MountOption, ReplyAttr, ReplyData, ReplyDirectory, ReplyEmpty, ReplyEntry, ReplyOpen, Request};
use lfs_lib::path;

use crate::error::{self, Context};
use crate::fs::{Attributes, Filesystem, FsError, Kind, OpenFlags};

const ROOT_INO: u64 = 1;
const BLOCK_SIZE: u32 = 4096;
const TTL: Duration = Duration::from_secs(60);

pub fn errno(err: &FsError) -> libc::c_int {
    match err {
        FsError::NotFound(_) => libc::ENOENT,
        FsError::NotADirectory(_) => libc::ENOTDIR,
        FsError::IsADirectory(_) => libc::EISDIR,
        FsError::PermissionDenied(_) => libc::EACCES,
        FsError::Range { .. } |
        FsError::InvalidArgument(_) => libc::EINVAL,
        FsError::Transport { .. } |
        FsError::Cycle(_) => libc::EIO,
    }
}

fn file_type(kind: Kind) -> FileType {
    match kind {
        Kind::Directory => FileType::Directory,
        Kind::RegularFile => FileType::RegularFile,
    }
}

/// truncating or appending counts as writing even with a read only access
/// mode
fn open_flags(flags: i32) -> OpenFlags {
    if flags & (libc::O_TRUNC | libc::O_APPEND) != 0 {
        OpenFlags::from_bits(flags | libc::O_WRONLY)
    } else {
        OpenFlags::from_bits(flags)
    }
}

pub struct Bridge {
    fs: Filesystem,
    paths: Vec<String>,
    inodes: HashMap<String, u64>,
    uid: u32,
    gid: u32,
}

impl Bridge {
    /// walks the tree from the root so inodes follow listing order
    pub fn new(fs: Filesystem) -> Result<Self, FsError> {
        let root = fs.index().root_path().to_owned();
        let mut paths = vec![root.clone()];
        let mut inodes = HashMap::new();
        let mut queue = std::collections::VecDeque::from([root.clone()]);

        inodes.insert(root, ROOT_INO);

        while let Some(parent) = queue.pop_front() {
            for entry in fs.list(&parent)? {
                if inodes.contains_key(&entry.path) {
                    continue;
                }

                paths.push(entry.path.clone());
                inodes.insert(entry.path.clone(), paths.len() as u64);

                if entry.kind == Kind::Directory {
                    queue.push_back(entry.path);
                }
            }
        }

        tracing::debug!("assigned {} inodes", paths.len());

        Ok(Bridge {
            fs,
            paths,
            inodes,
            uid: unsafe { libc::getuid() },
            gid: unsafe { libc::getgid() },
        })
    }

    fn path(&self, ino: u64) -> Option<&str> {
        let index = usize::try_from(ino.checked_sub(1)?).ok()?;

        self.paths.get(index).map(String::as_str)
    }

    fn parent_ino(&self, path: &str) -> u64 {
        path::parent(path)
            .and_then(|parent| self.inodes.get(parent))
            .copied()
            .unwrap_or(ROOT_INO)
    }

    fn file_attr(&self, ino: u64, attrs: &Attributes) -> FileAttr {
        let kind = file_type(attrs.kind);

        FileAttr {
            ino,
            size: attrs.size,
            blocks: attrs.size.div_ceil(512),
            atime: SystemTime::from(attrs.atime),
            mtime: SystemTime::from(attrs.mtime),
            ctime: SystemTime::from(attrs.ctime),
            crtime: SystemTime::from(attrs.ctime),
            kind,
            perm: attrs.mode as u16,
            nlink: if kind == FileType::Directory { 2 } else { 1 },
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: BLOCK_SIZE,
            flags: 0,
        }
    }

    fn attr(&self, ino: u64) -> Result<FileAttr, FsError> {
        let path = self.path(ino)
            .ok_or_else(|| FsError::NotFound(format!("inode {ino}")))?;
        let attrs = self.fs.attributes(path)?;

        Ok(self.file_attr(ino, &attrs))
    }
}

impl fuser::Filesystem for Bridge {
    fn init(
        &mut self,
        _req: &Request<'_>,
        _config: &mut fuser::KernelConfig
    ) -> Result<(), libc::c_int> {
        tracing::info!("mounted {} entries", self.paths.len());

        Ok(())
    }

    fn destroy(&mut self) {
        tracing::info!("unmounted");
    }

    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let (Some(parent), Some(name)) = (self.path(parent), name.to_str()) else {
            reply.error(libc::ENOENT);
            return;
        };

        let child = path::join(parent, name);

        match self.inodes.get(&child).map(|ino| self.attr(*ino)) {
            Some(Ok(attr)) => reply.entry(&TTL, &attr, 0),
            Some(Err(err)) => reply.error(errno(&err)),
            None => reply.error(libc::ENOENT),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        match self.attr(ino) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(err) => reply.error(errno(&err)),
        }
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        let Some(path) = self.path(ino) else {
            reply.error(libc::ENOENT);
            return;
        };

        match self.fs.open(path, open_flags(flags)) {
            Ok(()) => reply.opened(0, 0),
            Err(err) => {
                tracing::debug!("open \"{path}\" rejected: {err}");

                reply.error(errno(&err));
            }
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        let Some(path) = self.path(ino) else {
            reply.error(libc::ENOENT);
            return;
        };

        let Ok(offset) = u64::try_from(offset) else {
            reply.error(libc::EINVAL);
            return;
        };

        match self.fs.read(path, size as usize, offset) {
            Ok(bytes) => reply.data(&bytes),
            // reading at or past the end is how callers find the end of file
            Err(FsError::Range { .. }) => reply.data(&[]),
            Err(err) => {
                tracing::error!("read \"{path}\" failed: {err}");

                reply.error(errno(&err));
            }
        }
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        match self.attr(ino) {
            Ok(attr) if attr.kind == FileType::Directory => reply.opened(0, 0),
            Ok(_) => reply.error(libc::ENOTDIR),
            Err(err) => reply.error(errno(&err)),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let Some(path) = self.path(ino) else {
            reply.error(libc::ENOENT);
            return;
        };

        let list = match self.fs.list(path) {
            Ok(list) => list,
            Err(err) => {
                reply.error(errno(&err));
                return;
            }
        };

        let mut entries = vec![
            (ino, FileType::Directory, String::from(".")),
            (self.parent_ino(path), FileType::Directory, String::from("..")),
        ];

        for entry in list {
            if let Some(child) = self.inodes.get(&entry.path) {
                entries.push((*child, file_type(entry.kind), entry.name));
            }
        }

        let skip = usize::try_from(offset).unwrap_or(0);

        for (index, (child, kind, name)) in entries.into_iter().enumerate().skip(skip) {
            if reply.add(child, (index + 1) as i64, kind, &name) {
                break;
            }
        }

        reply.ok();
    }

    fn access(&mut self, _req: &Request<'_>, ino: u64, mask: i32, reply: ReplyEmpty) {
        if self.path(ino).is_none() {
            reply.error(libc::ENOENT);
        } else if mask & libc::W_OK != 0 {
            reply.error(libc::EROFS);
        } else {
            reply.ok();
        }
    }
}

/// blocks until the filesystem is unmounted
pub fn mount(fs: Filesystem, mountpoint: &Path, allow_other: bool) -> error::Result {
    let bridge = Bridge::new(fs)?;
    let mut options = vec![
        MountOption::FSName(String::from("lfs")),
        MountOption::RO,
        MountOption::AutoUnmount,
        MountOption::DefaultPermissions,
    ];

    if allow_other {
        options.push(MountOption::AllowOther);
    } else {
        options.push(MountOption::AllowRoot);
    }

    tracing::info!("mounting at \"{}\"", mountpoint.display());

    fuser::mount2(bridge, mountpoint, &options)
        .context(format!("failed to mount at \"{}\"", mountpoint.display()))
}
