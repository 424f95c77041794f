//! Windows scanner backed by the Native WiFi API (wlanapi.dll).
//!
//! Struct layouts follow the Windows SDK headers (wlanapi.h / windot11.h).
//! All API-allocated memory is released with `WlanFreeMemory`, and the client
//! handle is wrapped in an RAII guard so it is closed on every exit path.

use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::constants::SCAN_POLL_STEP;

use super::{
    channel_from_frequency_khz, AccessPointDescriptor, AuthAlgorithm, CipherAlgorithm,
    NetworkDescriptor, PhyType, ScanError, ScanResult, WirelessScanner,
};

const ERROR_SUCCESS: u32 = 0;
const WLAN_API_VERSION_2_0: u32 = 2;

/// DOT11_BSS_TYPE: any (infrastructure or independent)
const DOT11_BSS_TYPE_ANY: u32 = 3;

const DOT11_RATE_SET_MAX_LENGTH: usize = 126;

type Handle = *mut c_void;
type Dword = u32;
type Pvoid = *mut c_void;
type Bool = i32;

#[repr(C)]
#[derive(Clone, Copy)]
struct Guid {
    data1: u32,
    data2: u16,
    data3: u16,
    data4: [u8; 8],
}

/// SSID with length prefix, max 32 bytes
#[repr(C)]
#[derive(Clone, Copy)]
struct Dot11Ssid {
    ssid_length: u32,
    ssid: [u8; 32],
}

type Dot11MacAddress = [u8; 6];

#[repr(C)]
struct WlanInterfaceInfo {
    interface_guid: Guid,
    interface_description: [u16; 256],
    state: u32,
}

#[repr(C)]
struct WlanInterfaceInfoList {
    num_items: Dword,
    index: Dword,
    // Followed by WlanInterfaceInfo[num_items]
}

#[repr(C)]
struct WlanAvailableNetwork {
    profile_name: [u16; 256],
    dot11_ssid: Dot11Ssid,
    dot11_bss_type: u32,
    number_of_bssids: u32,
    network_connectable: Bool,
    not_connectable_reason: u32,
    number_of_phy_types: u32,
    phy_types: [u32; 8],
    more_phy_types: Bool,
    signal_quality: u32,
    security_enabled: Bool,
    dot11_default_auth_algorithm: u32,
    dot11_default_cipher_algorithm: u32,
    flags: u32,
    reserved: u32,
}

#[repr(C)]
struct WlanAvailableNetworkList {
    num_items: Dword,
    index: Dword,
    // Followed by WlanAvailableNetwork[num_items]
}

#[repr(C)]
struct WlanRateSet {
    rate_set_length: u32,
    rate_set: [u16; DOT11_RATE_SET_MAX_LENGTH],
}

#[repr(C)]
struct WlanBssEntry {
    dot11_ssid: Dot11Ssid,
    phy_id: u32,
    dot11_bssid: Dot11MacAddress,
    dot11_bss_type: u32,
    dot11_bss_phy_type: u32,
    rssi: i32,
    link_quality: u32,
    in_reg_domain: u8,
    beacon_period: u16,
    timestamp: u64,
    host_timestamp: u64,
    capability_info: u16,
    channel_center_frequency: u32,
    wlan_rate_set: WlanRateSet,
    ie_offset: u32,
    ie_size: u32,
}

#[repr(C)]
struct WlanBssList {
    total_size: Dword,
    num_items: Dword,
    // Followed by WlanBssEntry[num_items]
}

#[link(name = "wlanapi")]
extern "system" {
    fn WlanOpenHandle(
        client_version: Dword,
        reserved: Pvoid,
        negotiated_version: *mut Dword,
        client_handle: *mut Handle,
    ) -> Dword;

    fn WlanCloseHandle(client_handle: Handle, reserved: Pvoid) -> Dword;

    fn WlanEnumInterfaces(
        client_handle: Handle,
        reserved: Pvoid,
        interface_list: *mut *mut WlanInterfaceInfoList,
    ) -> Dword;

    fn WlanScan(
        client_handle: Handle,
        interface_guid: *const Guid,
        dot11_ssid: *const Dot11Ssid,
        ie_data: *const c_void,
        reserved: Pvoid,
    ) -> Dword;

    fn WlanGetAvailableNetworkList(
        client_handle: Handle,
        interface_guid: *const Guid,
        flags: Dword,
        reserved: Pvoid,
        network_list: *mut *mut WlanAvailableNetworkList,
    ) -> Dword;

    fn WlanGetNetworkBssList(
        client_handle: Handle,
        interface_guid: *const Guid,
        dot11_ssid: *const Dot11Ssid,
        dot11_bss_type: u32,
        security_enabled: Bool,
        reserved: Pvoid,
        bss_list: *mut *mut WlanBssList,
    ) -> Dword;

    fn WlanFreeMemory(memory: Pvoid);
}

/// RAII guard for the WLAN client handle.
struct WlanHandle {
    handle: Handle,
}

impl WlanHandle {
    fn open() -> ScanResult<Self> {
        let mut negotiated: Dword = 0;
        let mut handle: Handle = ptr::null_mut();

        // SAFETY: out-pointers reference valid stack variables
        let code = unsafe {
            WlanOpenHandle(WLAN_API_VERSION_2_0, ptr::null_mut(), &mut negotiated, &mut handle)
        };
        if code != ERROR_SUCCESS {
            return Err(ScanError::Api { call: "WlanOpenHandle", code });
        }

        log::debug!("WLAN handle opened (negotiated version {})", negotiated);
        Ok(Self { handle })
    }

    fn as_ptr(&self) -> Handle {
        self.handle
    }
}

impl Drop for WlanHandle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            // SAFETY: handle was obtained from WlanOpenHandle
            unsafe {
                WlanCloseHandle(self.handle, ptr::null_mut());
            }
        }
    }
}

pub struct WindowsScanner;

impl WindowsScanner {
    pub fn new() -> Self {
        log::info!("Windows wireless scanner initialised");
        Self
    }

    /// GUID of the first wireless interface.
    fn first_interface(handle: &WlanHandle) -> ScanResult<Guid> {
        let mut list_ptr: *mut WlanInterfaceInfoList = ptr::null_mut();

        // SAFETY: handle is valid, list_ptr references valid storage
        let code =
            unsafe { WlanEnumInterfaces(handle.as_ptr(), ptr::null_mut(), &mut list_ptr) };
        if code != ERROR_SUCCESS {
            return Err(ScanError::Api { call: "WlanEnumInterfaces", code });
        }

        // SAFETY: on success list_ptr is a valid WlanInterfaceInfoList
        let guid = unsafe {
            let list = &*list_ptr;
            if list.num_items == 0 {
                WlanFreeMemory(list_ptr as Pvoid);
                return Err(ScanError::NoInterface(
                    "no wireless interfaces present".into(),
                ));
            }

            let entries = (list_ptr as *const u8)
                .add(std::mem::size_of::<WlanInterfaceInfoList>())
                as *const WlanInterfaceInfo;
            (*entries).interface_guid
        };

        // SAFETY: list_ptr was allocated by WlanEnumInterfaces
        unsafe { WlanFreeMemory(list_ptr as Pvoid) };
        Ok(guid)
    }
}

impl WirelessScanner for WindowsScanner {
    fn enumerate_networks(&self) -> ScanResult<Vec<NetworkDescriptor>> {
        let handle = WlanHandle::open()?;
        let guid = Self::first_interface(&handle)?;

        let mut list_ptr: *mut WlanAvailableNetworkList = ptr::null_mut();

        // SAFETY: all pointers are valid for the duration of the call
        let code = unsafe {
            WlanGetAvailableNetworkList(
                handle.as_ptr(),
                &guid as *const Guid,
                0,
                ptr::null_mut(),
                &mut list_ptr,
            )
        };
        if code != ERROR_SUCCESS {
            return Err(ScanError::Api { call: "WlanGetAvailableNetworkList", code });
        }

        // SAFETY: on success list_ptr is a valid WlanAvailableNetworkList
        let networks = unsafe {
            let list = &*list_ptr;
            let entries = (list_ptr as *const u8)
                .add(std::mem::size_of::<WlanAvailableNetworkList>())
                as *const WlanAvailableNetwork;

            (0..list.num_items as usize)
                .map(|i| {
                    let entry = &*entries.add(i);
                    NetworkDescriptor {
                        ssid: extract_ssid(&entry.dot11_ssid),
                        signal_quality: entry.signal_quality,
                        security_enabled: entry.security_enabled != 0,
                        auth: AuthAlgorithm::from_dot11(entry.dot11_default_auth_algorithm),
                        cipher: CipherAlgorithm::from_dot11(entry.dot11_default_cipher_algorithm),
                    }
                })
                .collect::<Vec<_>>()
        };

        // SAFETY: list_ptr was allocated by WlanGetAvailableNetworkList
        unsafe { WlanFreeMemory(list_ptr as Pvoid) };

        log::debug!("enumerated {} networks", networks.len());
        Ok(networks)
    }

    fn enumerate_access_points(&self) -> ScanResult<Vec<AccessPointDescriptor>> {
        let handle = WlanHandle::open()?;
        let guid = Self::first_interface(&handle)?;

        let mut list_ptr: *mut WlanBssList = ptr::null_mut();

        // Null SSID asks for every BSS the driver knows about.
        // SAFETY: all pointers are valid for the duration of the call
        let code = unsafe {
            WlanGetNetworkBssList(
                handle.as_ptr(),
                &guid as *const Guid,
                ptr::null(),
                DOT11_BSS_TYPE_ANY,
                0,
                ptr::null_mut(),
                &mut list_ptr,
            )
        };
        if code != ERROR_SUCCESS {
            return Err(ScanError::Api { call: "WlanGetNetworkBssList", code });
        }

        // SAFETY: on success list_ptr is a valid WlanBssList
        let access_points = unsafe {
            let list = &*list_ptr;
            let entries = (list_ptr as *const u8).add(std::mem::size_of::<WlanBssList>())
                as *const WlanBssEntry;

            (0..list.num_items as usize)
                .map(|i| {
                    let entry = &*entries.add(i);
                    AccessPointDescriptor {
                        bssid: format_bssid(&entry.dot11_bssid),
                        ssid: extract_ssid(&entry.dot11_ssid),
                        link_quality: entry.link_quality,
                        signal_dbm: entry.rssi,
                        frequency_khz: entry.channel_center_frequency,
                        channel: channel_from_frequency_khz(entry.channel_center_frequency),
                        phy: PhyType::from_dot11(entry.dot11_bss_phy_type),
                    }
                })
                .collect::<Vec<_>>()
        };

        // SAFETY: list_ptr was allocated by WlanGetNetworkBssList
        unsafe { WlanFreeMemory(list_ptr as Pvoid) };

        log::debug!("enumerated {} access points", access_points.len());
        Ok(access_points)
    }

    fn trigger_scan(&self, max_wait: Duration, cancel: &AtomicBool) -> ScanResult<()> {
        let handle = WlanHandle::open()?;
        let guid = Self::first_interface(&handle)?;

        // SAFETY: handle and guid are valid
        let code = unsafe {
            WlanScan(
                handle.as_ptr(),
                &guid as *const Guid,
                ptr::null(),
                ptr::null(),
                ptr::null_mut(),
            )
        };
        if code != ERROR_SUCCESS {
            return Err(ScanError::Api { call: "WlanScan", code });
        }

        // The scan-complete notification API is not worth the ceremony here;
        // wait out the bound in small steps so shutdown stays responsive.
        let deadline = Instant::now() + max_wait;
        while Instant::now() < deadline {
            if cancel.load(Ordering::SeqCst) {
                return Err(ScanError::Interrupted);
            }
            std::thread::sleep(SCAN_POLL_STEP.min(deadline.saturating_duration_since(Instant::now())));
        }

        Ok(())
    }
}

fn extract_ssid(ssid: &Dot11Ssid) -> String {
    let len = ssid.ssid_length as usize;
    if len == 0 || len > 32 {
        return String::new();
    }
    String::from_utf8_lossy(&ssid.ssid[..len]).into_owned()
}

fn format_bssid(mac: &Dot11MacAddress) -> String {
    format!(
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}
