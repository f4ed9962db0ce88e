//! 驱动层错误类型定义

use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 串口 / 文件 IO 错误
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    /// 串口打开或配置失败
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// 通道号超出控制板范围
    #[error("Invalid servo channel {channel} (board has {available} channels)")]
    InvalidChannel { channel: u8, available: u8 },

    /// 后端错误（如 mock 注入的故障）
    #[error("Backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::DriverError;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::InvalidChannel {
            channel: 40,
            available: 32,
        };
        assert_eq!(
            err.to_string(),
            "Invalid servo channel 40 (board has 32 channels)"
        );

        let err = DriverError::Backend("bus unplugged".to_string());
        assert!(err.to_string().contains("bus unplugged"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: DriverError = io.into();
        match err {
            DriverError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_from_serial_error() {
        let serial = serialport::Error::new(serialport::ErrorKind::NoDevice, "no such port");
        let err: DriverError = serial.into();
        assert!(matches!(err, DriverError::Serial(_)));
        assert!(err.to_string().contains("no such port"));
    }
}
