/*!
# GraphiX

An interactive function plotter core, built in Rust.

## Overview

GraphiX turns typed equations such as `x^2` or `sin(x) / x` into curves on a
pannable, zoomable Cartesian canvas. Alongside the curves it shows a grid whose
spacing adapts to the zoom level, user data points (typed in or imported from
CSV), and on-canvas distance and angle measurements. Any frame can be exported
to PNG.

The crate contains no windowing code. A front end forwards pointer events and
method calls to a [`Graphix`] value and hands it a [`Surface`] to draw on once
per display refresh.

## Architecture

### Model
- **Expression compiler** - Tokenizes, parses and evaluates `y = f(x)` text
  (no dynamic code generation; a recursive-descent parser builds an AST)
- **Equation list** - Ordered equations with their colours
- **Point store** - Data points with stable ids, atomic CSV replacement
- **Measurement engine** - Tagged state machine for the distance and angle tools

### View
- **Viewport** - Screen/graph transform, pan, zoom about a pixel
- **Grid planner** - "Nice number" step selection, grid lines, tick labels
- **Curve rasterizer** - One sample per pixel column, breaks at asymptotes
- **Renderer** - Composes a frame onto any [`Surface`] (plotters bitmap or
  a recording surface for tests)

### Control
- **Frame scheduler** - Dirty flag that coalesces redraw requests
- **Application state** - Owns everything and handles input events

## Modules

- **expression**: Expression parsing, validation and evaluation
- **equation**: Equation records and the equation list
- **viewport**: Graph/screen coordinate transform
- **grid**: Grid step selection and line planning
- **rasterizer**: Function to polyline sampling
- **points**: The data point store
- **loader**: CSV parsing for point import
- **measure**: Distance and angle measurements
- **scheduler**: Redraw coalescing
- **theme**: Colours, light and dark themes
- **config**: JSON configuration
- **surface**: Drawing surfaces
- **render**: Frame composition
- **export**: PNG export
- **app**: The `Graphix` application state
- **error**: Error types

## Usage

```
use graphix::{Graphix, InputEvent, RecordingSurface, Tool};

let mut app = Graphix::default();
app.add_equation("x^2").unwrap();

// drag the view 40px to the right
app.handle_event(InputEvent::PointerDown { x: 400.0, y: 300.0 }).unwrap();
app.handle_event(InputEvent::PointerMove { x: 440.0, y: 300.0 }).unwrap();
app.handle_event(InputEvent::PointerUp).unwrap();

// measure the distance between two clicks
app.select_tool(Tool::Distance);
app.handle_event(InputEvent::PointerDown { x: 440.0, y: 300.0 }).unwrap();
let done = app.handle_event(InputEvent::PointerDown { x: 590.0, y: 100.0 }).unwrap();
assert_eq!(done.unwrap().value.label(), "5.00");

let mut surface = RecordingSurface::new(800, 600);
assert!(app.render_frame(&mut surface).unwrap());
assert!(!app.render_frame(&mut surface).unwrap());
```
*/

pub mod app;
pub mod config;
pub mod equation;
pub mod error;
pub mod export;
pub mod expression;
pub mod grid;
pub mod loader;
pub mod measure;
pub mod points;
pub mod rasterizer;
pub mod render;
pub mod scheduler;
pub mod surface;
pub mod theme;
pub mod viewport;

pub use app::{Graphix, InputEvent};
pub use config::GraphixConfig;
pub use equation::{EditOutcome, Equation, EquationId, EquationList};
pub use error::{CsvError, ExpressionError, GraphixError, MeasureError, RenderError};
pub use expression::{CompiledFunction, compile, validate};
pub use measure::{MeasureValue, Measurement, MeasurementEngine, Tool, ToolState};
pub use points::{Axis, Point, PointId, PointStore};
pub use scheduler::FrameScheduler;
pub use surface::{PlottersSurface, RecordingSurface, Surface};
pub use theme::{Rgb, Theme, ThemeName};
pub use viewport::{GraphPoint, ScreenPoint, Viewport};
