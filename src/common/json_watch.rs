use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Live filesystem watch on JSON files. Dropping it ends the watch.
pub struct JsonWatcher {
    _watcher: RecommendedWatcher,
}

/// Watch `path` for changes. If `path` is a directory every `*.json` file
/// directly inside it is watched. Otherwise the single file is watched
/// through its parent directory, so the watch survives the file being
/// replaced or created later.
///
/// `callback` receives the path of each file that was created, modified or
/// removed.
pub fn watch_json<F, P>(path: P, mut callback: F) -> notify::Result<JsonWatcher>
where
    F: FnMut(&Path) + Send + 'static,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let (dir, file_name) = if path.is_dir() {
        (path.to_path_buf(), None)
    } else {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (parent, path.file_name().map(OsStr::to_os_string))
    };

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(ev) => {
                if !matches!(
                    ev.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                for changed in ev.paths.iter().filter(|p| wanted(p, file_name.as_ref())) {
                    callback(changed);
                }
            }
            Err(e) => tracing::error!("json watch error: {:?}", e),
        },
        Config::default(),
    )?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(JsonWatcher { _watcher: watcher })
}

fn wanted(path: &Path, file_name: Option<&OsString>) -> bool {
    match file_name {
        Some(name) => path.file_name() == Some(name.as_os_str()),
        None => path.extension().and_then(|e| e.to_str()) == Some("json"),
    }
}
