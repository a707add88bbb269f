use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a whole text file into memory.
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/alice.txt"` → `"alice"`
/// - `"alice.txt"` → `"alice"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files in a directory whose extension matches one of
/// `extensions`.
///
/// Returns full paths, sorted, so callers process the corpus in a stable
/// order. Subdirectories are ignored.
pub fn list_files<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() {
			let matches = path
				.extension()
				.and_then(|extension| extension.to_str())
				.is_some_and(|extension| extensions.contains(&extension));
			if matches {
				files.push(path);
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scratch_dir(name: &str) -> PathBuf {
		let dir = env::temp_dir().join(format!("textgen-{}-{}", name, std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn list_files_filters_by_extension_and_sorts() {
		let dir = scratch_dir("io");
		fs::write(dir.join("b.txt"), "b").unwrap();
		fs::write(dir.join("a.md"), "a").unwrap();
		fs::write(dir.join("c.bin"), "c").unwrap();

		let files = list_files(&dir, &["txt", "md"]).unwrap();
		let names: Vec<String> = files
			.iter()
			.map(|path| get_filename(path).unwrap())
			.collect();
		assert_eq!(names, vec!["a", "b"]);

		fs::remove_dir_all(&dir).ok();
	}

	#[test]
	fn get_filename_drops_directory_and_extension() {
		assert_eq!(get_filename("./data/alice.txt").unwrap(), "alice");
		assert_eq!(get_filename("alice.txt").unwrap(), "alice");
	}
}
