//! Rendering-service URL construction and image download.

use crate::uml::Format;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const DEFAULT_PLANTUML_URL: &str = "http://www.plantuml.com/plantuml";

/// Build the rendering-service URL for an encoded diagram
pub fn diagram_url(base_url: &str, format: Format, encoded: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), format, encoded)
}

/// Download a rendered diagram, streaming the response body to a file
pub fn download(url: &str, path: &Path, progress: bool) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("sql-uml/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to request {url}"))?
        .error_for_status()
        .with_context(|| "rendering service returned an error")?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create output file: {}", path.display()))?;

    let bar = if progress {
        response.content_length().map(|total| {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes}",
                )
                .unwrap()
                .progress_chars("█▓▒░  "),
            );
            bar
        })
    } else {
        None
    };

    match bar {
        Some(bar) => {
            let tick = bar.clone();
            let mut reader = ProgressReader::new(response, move |n| tick.set_position(n));
            io::copy(&mut reader, &mut file)?;
            bar.finish_and_clear();
        }
        None => {
            io::copy(&mut response, &mut file)?;
        }
    }

    Ok(())
}

/// Reader wrapper that tracks bytes read and reports them to a callback
struct ProgressReader<R: Read> {
    reader: R,
    callback: Box<dyn Fn(u64)>,
    bytes_read: u64,
}

impl<R: Read> ProgressReader<R> {
    fn new<F>(reader: R, callback: F) -> Self
    where
        F: Fn(u64) + 'static,
    {
        Self {
            reader,
            callback: Box::new(callback),
            bytes_read: 0,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.bytes_read += n as u64;
        (self.callback)(self.bytes_read);
        Ok(n)
    }
}
