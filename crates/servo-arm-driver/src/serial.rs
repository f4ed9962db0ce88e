//! 串口舵机控制板后端
//!
//! 向任意 `std::io::Write` 写 [`ServoFrame`] 文本帧。
//!
//! - 串口设备（如 `/dev/ttyUSB0`、`COM3`）通过 `serialport` 打开，波特率和超时来自 [`SerialSettings`]
//! - 已存在的普通文件以追加方式打开（录制帧流）；不存在的路径一律按设备处理，从不创建文件

use crate::{DriverError, PulseRange, ServoBus};
use serialport::SerialPort;
use servo_arm_protocol::ServoFrame;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// 控制板默认通道数
pub const DEFAULT_CHANNEL_COUNT: u8 = 32;

/// 默认波特率
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// 默认读写超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// 串口参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// 打开串口设备
pub fn open_port<P: AsRef<Path>>(
    path: P,
    settings: &SerialSettings,
) -> Result<Box<dyn SerialPort>, DriverError> {
    let path = path.as_ref();
    let port = serialport::new(path.to_string_lossy(), settings.baud_rate)
        .timeout(settings.timeout)
        .open()?;
    info!(
        "Opened serial port {} @ {} baud",
        path.display(),
        settings.baud_rate
    );
    Ok(port)
}

/// 路径是否指向已存在的普通文件（否则按串口设备处理）
pub fn is_regular_file<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

/// 串口舵机总线
pub struct SerialServoBus<W: Write> {
    sink: W,
    pulse: PulseRange,
    channel_count: u8,
}

impl SerialServoBus<Box<dyn SerialPort>> {
    /// 打开串口设备
    pub fn open_device<P: AsRef<Path>>(
        path: P,
        settings: &SerialSettings,
        pulse: PulseRange,
    ) -> Result<Self, DriverError> {
        Ok(Self::new(open_port(path, settings)?, pulse))
    }
}

impl SerialServoBus<File> {
    /// 以追加方式打开已存在的文件
    pub fn open_file<P: AsRef<Path>>(path: P, pulse: PulseRange) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let file = OpenOptions::new().append(true).open(path)?;
        info!("Recording servo frames to {}", path.display());
        Ok(Self::new(file, pulse))
    }
}

impl<W: Write> SerialServoBus<W> {
    pub fn new(sink: W, pulse: PulseRange) -> Self {
        Self {
            sink,
            pulse,
            channel_count: DEFAULT_CHANNEL_COUNT,
        }
    }

    /// 设置控制板通道数
    pub fn with_channel_count(mut self, channel_count: u8) -> Self {
        self.channel_count = channel_count;
        self
    }

    pub fn pulse_range(&self) -> PulseRange {
        self.pulse
    }

    /// 取回底层 sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> ServoBus for SerialServoBus<W> {
    fn write_angle(&mut self, channel: u8, angle: i32) -> Result<(), DriverError> {
        if channel >= self.channel_count {
            return Err(DriverError::InvalidChannel {
                channel,
                available: self.channel_count,
            });
        }

        let frame = ServoFrame::new(channel, self.pulse.angle_to_pulse(angle));
        debug!("servo frame {:?}", frame);
        self.sink.write_all(frame.encode().as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        self.sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_text_frames() {
        let mut bus = SerialServoBus::new(Vec::new(), PulseRange::default());
        bus.write_angle(0, 90).unwrap();
        bus.write_angle(4, 0).unwrap();
        bus.flush().unwrap();

        let out = String::from_utf8(bus.into_inner()).unwrap();
        assert_eq!(out, "#0P1450\r#4P500\r");
    }

    #[test]
    fn test_rejects_channel_out_of_range() {
        let mut bus = SerialServoBus::new(Vec::new(), PulseRange::default()).with_channel_count(5);
        let err = bus.write_angle(5, 90).unwrap_err();
        assert!(matches!(
            err,
            DriverError::InvalidChannel {
                channel: 5,
                available: 5
            }
        ));
        assert!(bus.into_inner().is_empty());
    }

    #[test]
    fn test_open_file_appends_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servo.out");
        fs::write(&path, "#0P1450\r").unwrap();

        let mut bus = SerialServoBus::open_file(&path, PulseRange::default()).unwrap();
        bus.write_angle(2, 180).unwrap();
        bus.flush().unwrap();
        drop(bus);

        assert_eq!(fs::read_to_string(&path).unwrap(), "#0P1450\r#2P2400\r");
    }

    #[test]
    fn test_open_file_never_creates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ttyUSB9");

        assert!(SerialServoBus::open_file(&path, PulseRange::default()).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_device_fails_without_creating_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ttyUSB9");

        assert!(!is_regular_file(&path));
        let result =
            SerialServoBus::open_device(&path, &SerialSettings::default(), PulseRange::default());
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_regular_file_detection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.log");
        fs::write(&path, "").unwrap();

        assert!(is_regular_file(&path));
        assert!(!is_regular_file(dir.path()));
    }

    #[test]
    fn test_default_settings() {
        let settings = SerialSettings::default();
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.timeout, Duration::from_millis(100));
    }
}
