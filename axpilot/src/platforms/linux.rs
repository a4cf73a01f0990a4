//! AT-SPI2 backend: adapts the asynchronous D-Bus accessibility proxies
//! to the synchronous [`AccessibleElement`] port.
//!
//! A current-thread tokio runtime is owned by the backend and shared by
//! every element it hands out; all proxy calls go through `block_on`.
//! Elements are addressed by (bus name, object path) and re-resolve
//! their proxies on every query, so nothing is cached across commands.

use crate::element::{AccessibleElement, UiElement};
use crate::errors::AutomationError;
use crate::geometry::{ScreenRect, WindowRect};
use crate::platforms::AccessibilityBackend;
use atspi::proxy::accessible::AccessibleProxy;
use atspi::proxy::component::ComponentProxy;
use atspi::{AccessibilityConnection, CoordType, State};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Runtime;
use zbus::names::BusName;

const REGISTRY_DESTINATION: &str = "org.a11y.atspi.Registry";
const REGISTRY_ROOT_PATH: &str = "/org/a11y/atspi/accessible/root";

fn platform_err(context: &str, e: impl fmt::Display) -> AutomationError {
    AutomationError::PlatformError(format!("{context}: {e}"))
}

/// Connection to the AT-SPI2 accessibility bus.
pub struct AtspiBackend {
    runtime: Arc<Runtime>,
    connection: zbus::Connection,
}

impl AtspiBackend {
    /// Connect to the accessibility bus. Failure here is the driver's
    /// initialization failure: terminal, distinct from lookup failures.
    pub fn connect() -> Result<Self, AutomationError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AutomationError::ServiceInit(format!("failed to create runtime: {e}")))?;

        let connection = runtime
            .block_on(AccessibilityConnection::new())
            .map_err(|e| {
                AutomationError::ServiceInit(format!(
                    "could not connect to the accessibility bus: {e}"
                ))
            })?;

        Ok(Self {
            runtime: Arc::new(runtime),
            connection: connection.connection().clone(),
        })
    }
}

impl AccessibilityBackend for AtspiBackend {
    fn desktop(&self) -> Result<UiElement, AutomationError> {
        Ok(UiElement::new(Box::new(AtspiElement {
            runtime: self.runtime.clone(),
            connection: self.connection.clone(),
            bus_name: REGISTRY_DESTINATION.to_string(),
            path: REGISTRY_ROOT_PATH.to_string(),
        })))
    }
}

/// One node of the AT-SPI tree, addressed by bus name and object path.
#[derive(Clone)]
pub struct AtspiElement {
    runtime: Arc<Runtime>,
    connection: zbus::Connection,
    bus_name: String,
    path: String,
}

impl fmt::Debug for AtspiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtspiElement")
            .field("bus_name", &self.bus_name)
            .field("path", &self.path)
            .finish()
    }
}

impl AtspiElement {
    async fn accessible(&self) -> Result<AccessibleProxy<'_>, AutomationError> {
        AccessibleProxy::builder(&self.connection)
            .destination(self.bus_name.clone())
            .map_err(|e| platform_err("bad destination", e))?
            .path(self.path.clone())
            .map_err(|e| platform_err("bad object path", e))?
            .build()
            .await
            .map_err(|e| platform_err("accessible proxy", e))
    }

    async fn component(&self) -> Result<ComponentProxy<'_>, AutomationError> {
        ComponentProxy::builder(&self.connection)
            .destination(self.bus_name.clone())
            .map_err(|e| platform_err("bad destination", e))?
            .path(self.path.clone())
            .map_err(|e| platform_err("bad object path", e))?
            .build()
            .await
            .map_err(|e| platform_err("component proxy", e))
    }

    async fn extents(&self, coord_type: CoordType) -> Result<(i32, i32, i32, i32), AutomationError> {
        let component = self.component().await?;
        let extents = component
            .get_extents(coord_type)
            .await
            .map_err(|e| platform_err("get extents", e))?;
        Ok(extents)
    }
}

impl AccessibleElement for AtspiElement {
    fn child_count(&self) -> Result<usize, AutomationError> {
        let count = self.runtime.block_on(async {
            let proxy = self.accessible().await?;
            proxy
                .child_count()
                .await
                .map_err(|e| platform_err("child count", e))
        })?;
        Ok(count.max(0) as usize)
    }

    fn child_at(&self, index: usize) -> Result<UiElement, AutomationError> {
        let (bus_name, path) = self.runtime.block_on(async {
            let proxy = self.accessible().await?;
            let child = proxy
                .get_child_at_index(index as i32)
                .await
                .map_err(|e| platform_err("child at index", e))?;
            Ok::<_, AutomationError>((child.name.to_string(), child.path.to_string()))
        })?;
        Ok(UiElement::new(Box::new(AtspiElement {
            runtime: self.runtime.clone(),
            connection: self.connection.clone(),
            bus_name,
            path,
        })))
    }

    fn process_id(&self) -> Result<u32, AutomationError> {
        // The accessibility bus daemon knows which process owns each
        // connection; this is how libatspi resolves get_process_id too.
        self.runtime.block_on(async {
            let dbus = zbus::fdo::DBusProxy::new(&self.connection)
                .await
                .map_err(|e| platform_err("dbus proxy", e))?;
            let name = BusName::try_from(self.bus_name.as_str())
                .map_err(|e| platform_err("bus name", e))?;
            dbus.get_connection_unix_process_id(name)
                .await
                .map_err(|e| platform_err("connection pid", e))
        })
    }

    fn role(&self) -> Result<String, AutomationError> {
        self.runtime.block_on(async {
            let proxy = self.accessible().await?;
            let role = proxy
                .get_role()
                .await
                .map_err(|e| platform_err("get role", e))?;
            Ok(format!("{role:?}"))
        })
    }

    fn name(&self) -> Result<String, AutomationError> {
        self.runtime.block_on(async {
            let proxy = self.accessible().await?;
            proxy.name().await.map_err(|e| platform_err("get name", e))
        })
    }

    fn screen_extents(&self) -> Result<ScreenRect, AutomationError> {
        let (x, y, width, height) = self
            .runtime
            .block_on(self.extents(CoordType::Screen))?;
        Ok(ScreenRect::new(x, y, width, height))
    }

    fn window_extents(&self) -> Result<WindowRect, AutomationError> {
        let (x, y, width, height) = self
            .runtime
            .block_on(self.extents(CoordType::Window))?;
        Ok(WindowRect::new(x, y, width, height))
    }

    fn is_focusable(&self) -> Result<bool, AutomationError> {
        self.runtime.block_on(async {
            let proxy = self.accessible().await?;
            let state = proxy
                .get_state()
                .await
                .map_err(|e| platform_err("get state", e))?;
            Ok(state.contains(State::Focusable))
        })
    }

    fn grab_focus(&self) -> Result<bool, AutomationError> {
        self.runtime.block_on(async {
            let component = self.component().await?;
            component
                .grab_focus()
                .await
                .map_err(|e| platform_err("grab focus", e))
        })
    }

    fn clone_box(&self) -> Box<dyn AccessibleElement> {
        Box::new(self.clone())
    }
}
