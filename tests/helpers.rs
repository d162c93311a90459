// Shared test helpers for archive construction and a text-format test database.
//
// The text format is small enough to write by hand and strict enough to catch
// truncated or half-written files:
//
//   GEOTEST <record count>
//   <ip> <country> <city>
//   ...
//   END

use std::collections::HashMap;
use std::io::Write;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use flate2::write::GzEncoder;
use flate2::Compression;
use geolite_service::{DatabaseRecord, DecodeError, GeoDatabase, GeoDecoder, GeoLiteConfig};

/// Decoder for the text test format; counts how often a database is opened.
#[derive(Default)]
pub struct TextDecoder {
    pub opens: AtomicUsize,
}

#[allow(dead_code)] // Used by other test files
impl TextDecoder {
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

struct TextDatabase {
    records: HashMap<IpAddr, (String, String)>,
}

impl GeoDecoder for TextDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn GeoDatabase>, DecodeError> {
        self.opens.fetch_add(1, Ordering::SeqCst);

        let invalid = |message: &str| DecodeError::Open {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(&e.to_string()))?;
        let mut lines = content.lines();

        let count: usize = lines
            .next()
            .and_then(|header| header.strip_prefix("GEOTEST "))
            .and_then(|n| n.trim().parse().ok())
            .ok_or_else(|| invalid("missing GEOTEST header"))?;

        let mut records = HashMap::with_capacity(count);
        for _ in 0..count {
            let line = lines.next().ok_or_else(|| invalid("truncated record list"))?;
            let mut fields = line.split(' ');
            match (fields.next(), fields.next(), fields.next()) {
                (Some(ip), Some(country), Some(city)) => {
                    let ip: IpAddr = ip.parse().map_err(|_| invalid("bad address"))?;
                    records.insert(ip, (country.to_string(), city.to_string()));
                }
                _ => return Err(invalid("malformed record")),
            }
        }

        if lines.next() != Some("END") {
            return Err(invalid("missing END marker"));
        }

        Ok(Box::new(TextDatabase { records }))
    }
}

impl GeoDatabase for TextDatabase {
    fn lookup(&self, ip: IpAddr) -> Result<Option<DatabaseRecord>, DecodeError> {
        Ok(self.records.get(&ip).map(|(country, city)| DatabaseRecord {
            country: Some(country.clone()),
            city: Some(city.clone()),
        }))
    }
}

/// Renders a text-format database with `padding` filler records appended.
#[allow(dead_code)] // Used by other test files
pub fn text_database(records: &[(&str, &str, &str)], padding: usize) -> Vec<u8> {
    let mut out = format!("GEOTEST {}\n", records.len() + padding);
    for (ip, country, city) in records {
        out.push_str(&format!("{} {} {}\n", ip, country, city));
    }
    for i in 0..padding {
        // 198.18.0.0/15 is benchmarking space, never a real record
        out.push_str(&format!(
            "198.{}.{}.{} Padland Padcity\n",
            18 + (i >> 16) % 2,
            (i >> 8) & 0xff,
            i & 0xff
        ));
    }
    out.push_str("END\n");
    out.into_bytes()
}

/// Creates a tar.gz archive with the specified files.
#[allow(dead_code)] // Used by other test files
pub fn build_tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut tar_builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_path(name).unwrap();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        tar_builder.append(&header, *content).unwrap();
    }
    let tar_bytes = tar_builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_bytes).unwrap();
    encoder.finish().unwrap()
}

/// Wraps a database in the directory layout MaxMind archives use.
#[allow(dead_code)] // Used by other test files
pub fn geolite_archive(database: &[u8]) -> Vec<u8> {
    build_tar_gz(&[
        (
            "GeoLite2-City_20240101/COPYRIGHT.txt",
            b"Database and Contents Copyright (c) MaxMind",
        ),
        ("GeoLite2-City_20240101/GeoLite2-City.mmdb", database),
        (
            "GeoLite2-City_20240101/LICENSE.txt",
            b"GeoLite2 End User License Agreement",
        ),
    ])
}

/// Backdates the modification time of `path` by `age`.
#[allow(dead_code)] // Used by other test files
pub fn set_age(path: &Path, age: Duration) {
    let file = std::fs::File::options()
        .write(true)
        .open(path)
        .expect("Failed to open file");
    file.set_modified(SystemTime::now() - age)
        .expect("Failed to set modification time");
}

/// Staging files left behind in `dir`.
#[allow(dead_code)] // Used by other test files
pub fn staging_leftovers(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(".mmdb.tmp"))
        })
        .collect()
}

/// Configuration pointing at `db_path` and a custom download URL.
#[allow(dead_code)] // Used by other test files
pub fn test_config(db_path: PathBuf, db_url: String) -> GeoLiteConfig {
    GeoLiteConfig {
        license_key: "test-license-key".to_string(),
        db_url,
        db_path,
        ..Default::default()
    }
}
