use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// A streamed upload staged on local disk.
///
/// The file is deleted when the value is dropped, whichever way the request ends.
pub struct StagedUpload {
    file: NamedTempFile,
    writer: Option<tokio::fs::File>,
    size: u64,
}

impl StagedUpload {
    /// Create an empty staging file in `dir`, or the system temp dir when `None`.
    pub fn create(dir: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("tubely-upload-");

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let writer = tokio::fs::File::from_std(file.as_file().try_clone()?);

        Ok(Self {
            file,
            writer: Some(writer),
            size: 0,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub async fn append(&mut self, chunk: &[u8]) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::other("staged upload already finished"))?;
        writer.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Flush and close the write handle. Returns the number of bytes staged.
    pub async fn finish(&mut self) -> io::Result<u64> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
            writer.sync_all().await?;
        }
        Ok(self.size)
    }
}
