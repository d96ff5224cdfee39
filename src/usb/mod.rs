//! USB Device subsystem - presents a CDC-ACM serial port to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. The single interface is a virtual COM port; every string
//! confirmed on the buttons is written to it as one line.

pub mod serial;
