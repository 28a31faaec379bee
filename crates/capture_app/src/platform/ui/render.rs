use capture_core::{Control, ImageSource, Viewfinder, WorkflowViewModel};

/// Text rendition of the capture screen, one line per visible element.
pub fn render(view: &WorkflowViewModel) -> Vec<String> {
    let mut lines = vec![format!("[{}]", viewfinder_label(&view.viewfinder))];

    if let Some(badge) = &view.location_badge {
        lines.push(format!("Location: {}", badge.text()));
    }
    if let Some(hint) = &view.hint {
        lines.push(hint.clone());
    }
    if let Some(notice) = &view.notice {
        lines.push(format!("! {notice}"));
    }
    if view.sending {
        lines.push("Sending...".to_string());
    }

    let buttons: Vec<String> = [
        ("Shutter", view.shutter),
        ("Pick file", view.pick_file),
        ("Retake", view.retake),
        ("Send", view.send),
    ]
    .into_iter()
    .filter_map(|(name, control)| button(name, control))
    .collect();
    if !buttons.is_empty() {
        lines.push(buttons.join("  "));
    }

    lines
}

fn viewfinder_label(viewfinder: &Viewfinder) -> String {
    match viewfinder {
        Viewfinder::Starting => "Starting camera".to_string(),
        Viewfinder::Live => "Live camera".to_string(),
        Viewfinder::Unavailable => "Camera unavailable".to_string(),
        Viewfinder::Preview(image) => {
            let source = match image.source() {
                ImageSource::Camera => "camera",
                ImageSource::File => "file",
            };
            format!(
                "Preview {}x{} {} from {} ({} bytes)",
                image.width(),
                image.height(),
                image.content_type(),
                source,
                image.len()
            )
        }
        Viewfinder::Confirmation => "Donation sent. Thank you!".to_string(),
        Viewfinder::Closed => "Closed".to_string(),
    }
}

fn button(name: &str, control: Control) -> Option<String> {
    match control {
        Control::Hidden => None,
        Control::Disabled => Some(format!("({name})")),
        Control::Enabled => Some(format!("<{name}>")),
    }
}

#[cfg(test)]
mod tests {
    use capture_core::{
        CapturedImage, Control, ImageSource, LocationBadge, Viewfinder, WorkflowViewModel,
    };

    use super::render;

    #[test]
    fn degraded_screen_offers_file_picker_only() {
        let view = WorkflowViewModel {
            viewfinder: Viewfinder::Unavailable,
            pick_file: Control::Enabled,
            location_badge: Some(LocationBadge {
                label: "Mumbai, Maharashtra".to_string(),
                approximate: true,
            }),
            hint: Some("Camera access not available.".to_string()),
            ..WorkflowViewModel::default()
        };
        assert_eq!(
            render(&view),
            vec![
                "[Camera unavailable]",
                "Location: Mumbai, Maharashtra (approximate)",
                "Camera access not available.",
                "<Pick file>",
            ]
        );
    }

    #[test]
    fn in_flight_preview_shows_disabled_actions() {
        let image = CapturedImage::new(vec![1u8, 2, 3], "image/jpeg", 640, 480, ImageSource::Camera);
        let view = WorkflowViewModel {
            viewfinder: Viewfinder::Preview(image),
            retake: Control::Disabled,
            send: Control::Disabled,
            sending: true,
            ..WorkflowViewModel::default()
        };
        let lines = render(&view);
        assert_eq!(lines[0], "[Preview 640x480 image/jpeg from camera (3 bytes)]");
        assert_eq!(lines[1], "Sending...");
        assert_eq!(lines[2], "(Retake)  (Send)");
    }

    #[test]
    fn confirmation_has_no_controls() {
        let view = WorkflowViewModel {
            viewfinder: Viewfinder::Confirmation,
            ..WorkflowViewModel::default()
        };
        assert_eq!(render(&view), vec!["[Donation sent. Thank you!]"]);
    }
}
