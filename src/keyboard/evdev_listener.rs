//! Raw evdev-based report source for Linux
//!
//! Reads key events straight from `/dev/input/event*`, converts the scancodes
//! to HID key ids and assembles boot-protocol reports from them. Unlike the
//! polling listener this sees every transition, including keys pressed and
//! released between two polls.

use super::builder::ReportBuilder;
use super::event::SourceEvent;
use super::scancode::ScanCode;
use log::{debug, info, warn};
use nix::libc;
use std::fs::{self, File};
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;

/// Error type for evdev operations
#[derive(Debug, Error)]
pub enum EvdevError {
    #[error("No keyboard devices found")]
    NoDevices,
    #[error("Permission denied accessing {0}")]
    PermissionDenied(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Device enumeration failed: {0}")]
    EnumerationFailed(String),
}

/// A raw input event from the kernel
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct InputEvent {
    tv_sec: i64,
    tv_usec: i64,
    event_type: u16,
    code: u16,
    value: i32,
}

const EV_KEY: u16 = 0x01;
const KEY_RELEASE: i32 = 0;
const KEY_REPEAT: i32 = 2;
const INPUT_EVENT_SIZE: usize = std::mem::size_of::<InputEvent>();

/// Find all keyboard input devices
fn find_keyboard_devices() -> Result<Vec<PathBuf>, EvdevError> {
    let input_dir = PathBuf::from("/dev/input");
    if !input_dir.exists() {
        return Err(EvdevError::EnumerationFailed(
            "/dev/input does not exist".to_string(),
        ));
    }

    let mut keyboards = Vec::new();

    if let Ok(entries) = fs::read_dir(&input_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if name.starts_with("event") && is_keyboard_device(&path) {
                keyboards.push(path);
            }
        }
    }

    if keyboards.is_empty() {
        return Err(EvdevError::NoDevices);
    }

    keyboards.sort();
    Ok(keyboards)
}

/// Check if a device is a keyboard by examining /sys/class/input
fn is_keyboard_device(device_path: &Path) -> bool {
    let Some(name) = device_path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    // Key capabilities are a hex bitmap; keyboards report many keys
    let caps_path = format!("/sys/class/input/{}/device/capabilities/key", name);
    if let Ok(caps) = fs::read_to_string(&caps_path) {
        let trimmed = caps.trim();
        if !trimmed.is_empty() && trimmed != "0" {
            let total_bits: u32 = trimmed
                .split_whitespace()
                .filter_map(|hex| u64::from_str_radix(hex, 16).ok())
                .map(|n| n.count_ones())
                .sum();
            return total_bits > 50;
        }
    }

    device_name(device_path)
        .map(|n| {
            let lower = n.to_lowercase();
            lower.contains("keyboard") || lower.contains("kbd") || lower.contains("hid")
        })
        .unwrap_or(false)
}

/// Device name from sysfs, if readable
fn device_name(device_path: &Path) -> Option<String> {
    let name = device_path.file_name()?.to_str()?;
    let name_path = format!("/sys/class/input/{}/device/name", name);
    fs::read_to_string(name_path)
        .ok()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

struct Device {
    file: File,
    path: PathBuf,
}

/// Evdev report source
pub struct EvdevListener {
    devices: Vec<Device>,
    builder: ReportBuilder,
    event_tx: mpsc::Sender<SourceEvent>,
    buffer: Vec<u8>,
    connected: bool,
}

impl EvdevListener {
    /// Open every readable keyboard device and announce the connection
    pub fn new(event_tx: mpsc::Sender<SourceEvent>) -> Result<Self, EvdevError> {
        let device_paths = find_keyboard_devices()?;
        let mut devices = Vec::new();

        for path in device_paths {
            match File::open(&path) {
                Ok(file) => {
                    let fd = file.as_raw_fd();
                    // SAFETY: fd stays valid for the lifetime of `file`
                    unsafe {
                        let flags = libc::fcntl(fd, libc::F_GETFL);
                        libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
                    }
                    devices.push(Device { file, path });
                }
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    debug!("skipping {}: permission denied", path.display());
                    continue;
                }
                Err(e) => return Err(EvdevError::Io(e)),
            }
        }

        if devices.is_empty() {
            return Err(EvdevError::PermissionDenied(
                "Cannot access any keyboard devices. Try running with sudo or add user to 'input' group.".to_string(),
            ));
        }

        let name = devices
            .iter()
            .find_map(|d| device_name(&d.path))
            .unwrap_or_else(|| "Unknown Keyboard".to_string());
        info!("evdev source opened {} device(s): {}", devices.len(), name);
        let _ = event_tx.send(SourceEvent::Connected(name));

        Ok(Self {
            devices,
            builder: ReportBuilder::new(),
            event_tx,
            buffer: vec![0u8; INPUT_EVENT_SIZE * 64],
            connected: true,
        })
    }

    /// Try to create an evdev listener, return None if not available
    pub fn try_new(event_tx: mpsc::Sender<SourceEvent>) -> Option<Self> {
        match Self::new(event_tx) {
            Ok(listener) => Some(listener),
            Err(e) => {
                debug!("evdev unavailable: {}", e);
                None
            }
        }
    }

    /// Get the number of open devices
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Read pending key events from every device.
    /// Returns the number of reports sent.
    pub fn poll(&mut self) -> usize {
        if !self.connected {
            return 0;
        }

        let mut report_count = 0;
        let mut failed = Vec::new();

        for (index, device) in self.devices.iter_mut().enumerate() {
            loop {
                match device.file.read(&mut self.buffer) {
                    Ok(bytes_read) if bytes_read >= INPUT_EVENT_SIZE => {
                        let num_events = bytes_read / INPUT_EVENT_SIZE;
                        for i in 0..num_events {
                            let offset = i * INPUT_EVENT_SIZE;
                            let event_bytes = &self.buffer[offset..offset + INPUT_EVENT_SIZE];

                            // SAFETY: the slice holds INPUT_EVENT_SIZE bytes written by the kernel
                            let input_event: InputEvent = unsafe {
                                std::ptr::read_unaligned(event_bytes.as_ptr() as *const InputEvent)
                            };

                            if input_event.event_type != EV_KEY || input_event.value == KEY_REPEAT {
                                continue;
                            }

                            let key = ScanCode::new(input_event.code).to_key_id();
                            if key.is_none() {
                                continue;
                            }
                            let changed = if input_event.value == KEY_RELEASE {
                                self.builder.release(key)
                            } else {
                                self.builder.press(key)
                            };
                            if changed {
                                let report = self.builder.report().to_bytes().to_vec();
                                let _ = self.event_tx.send(SourceEvent::Report(report));
                                report_count += 1;
                            }
                        }
                    }
                    Ok(_) => break,
                    Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                    Err(e) => {
                        warn!("{} read failed: {}", device.path.display(), e);
                        failed.push(index);
                        break;
                    }
                }
            }
        }

        if failed.is_empty() {
            return report_count;
        }
        for index in failed.into_iter().rev() {
            self.devices.remove(index);
        }
        if self.devices.is_empty() {
            info!("all evdev devices gone");
            self.builder.clear();
            self.connected = false;
            let _ = self.event_tx.send(SourceEvent::Disconnected);
        } else if release_all(&mut self.builder, &self.event_tx) {
            report_count += 1;
        }

        report_count
    }

    /// Forget held keys without emitting anything
    pub fn reset(&mut self) {
        self.builder.clear();
    }
}

/// Drop every held key after a device went away, sending the empty report.
///
/// The builder is shared across devices and cannot tell which keys the lost
/// device was holding.
fn release_all(builder: &mut ReportBuilder, event_tx: &mpsc::Sender<SourceEvent>) -> bool {
    if builder.report().is_empty() {
        return false;
    }
    builder.clear();
    let _ = event_tx.send(SourceEvent::Report(builder.report().to_bytes().to_vec()));
    true
}

/// Get a status message about evdev availability
pub fn evdev_status() -> String {
    match find_keyboard_devices() {
        Ok(devices) => format!("{} keyboard device(s) found", devices.len()),
        Err(EvdevError::NoDevices) => "No keyboard devices found".to_string(),
        Err(EvdevError::PermissionDenied(_)) => {
            "Permission denied - run with sudo or add user to 'input' group".to_string()
        }
        Err(e) => format!("Error: {}", e),
    }
}
