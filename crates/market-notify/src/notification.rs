//! Notification events and their rendered messages

use market_core::OrderStatus;
use rust_decimal::Decimal;

use crate::notifier::EmailMessage;

/// One line of an order summary inside a notification
#[derive(Debug, Clone)]
pub struct NotificationLine {
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// A notification event emitted by the order workflow or auth flows
#[derive(Debug, Clone)]
pub enum Notification {
    /// Sent to the buyer right after an order is placed
    OrderConfirmation {
        to: String,
        buyer_name: String,
        order_number: String,
        total_amount: Decimal,
        items: Vec<NotificationLine>,
        shipping_address: String,
        payment_method: String,
    },
    /// Sent to the buyer on any non-terminal status change
    OrderStatusUpdate {
        to: String,
        buyer_name: String,
        order_number: String,
        status: OrderStatus,
    },
    /// Sent to the buyer when the order reaches `completed`
    OrderDelivered {
        to: String,
        buyer_name: String,
        order_number: String,
        total_amount: Decimal,
        items: Vec<NotificationLine>,
    },
    /// Password-reset token delivery
    PasswordReset {
        to: String,
        name: String,
        reset_token: String,
    },
}

impl Notification {
    /// The recipient address
    pub fn recipient(&self) -> &str {
        match self {
            Self::OrderConfirmation { to, .. }
            | Self::OrderStatusUpdate { to, .. }
            | Self::OrderDelivered { to, .. }
            | Self::PasswordReset { to, .. } => to,
        }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderConfirmation { .. } => "order_confirmation",
            Self::OrderStatusUpdate { .. } => "order_status_update",
            Self::OrderDelivered { .. } => "order_delivered",
            Self::PasswordReset { .. } => "password_reset",
        }
    }

    /// Render into a deliverable message
    pub fn to_message(&self, sender: &str) -> EmailMessage {
        let (subject, body) = match self {
            Self::OrderConfirmation {
                buyer_name,
                order_number,
                total_amount,
                items,
                shipping_address,
                payment_method,
                ..
            } => (
                format!("Order confirmation - {order_number}"),
                format!(
                    "Hello {buyer_name},\n\n\
                     Thank you for your order {order_number}.\n\n\
                     {}\n\
                     Total: {total_amount}\n\
                     Payment: {payment_method}\n\
                     Shipping to: {shipping_address}\n\n\
                     The seller will review your order shortly.",
                    render_lines(items)
                ),
            ),
            Self::OrderStatusUpdate {
                buyer_name,
                order_number,
                status,
                ..
            } => (
                format!("Order {order_number} is now {status}"),
                format!(
                    "Hello {buyer_name},\n\n{}",
                    status_message(order_number, *status)
                ),
            ),
            Self::OrderDelivered {
                buyer_name,
                order_number,
                total_amount,
                items,
                ..
            } => (
                format!("Your order {order_number} has been delivered"),
                format!(
                    "Hello {buyer_name},\n\n\
                     Your order {order_number} has been delivered successfully!\n\n\
                     {}\n\
                     Total: {total_amount}\n\n\
                     You can now leave a review for your purchase.",
                    render_lines(items)
                ),
            ),
            Self::PasswordReset {
                name, reset_token, ..
            } => (
                "Password reset request".to_string(),
                format!(
                    "Hello {name},\n\n\
                     We received a request to reset your password. Use this token to \
                     set a new one:\n\n    {reset_token}\n\n\
                     The token expires in 1 hour. If you didn't request a reset, you \
                     can ignore this message."
                ),
            ),
        };

        EmailMessage {
            from: sender.to_string(),
            to: self.recipient().to_string(),
            subject,
            body,
        }
    }
}

fn render_lines(items: &[NotificationLine]) -> String {
    items
        .iter()
        .map(|line| format!("  {} x{} @ {}\n", line.title, line.quantity, line.unit_price))
        .collect()
}

fn status_message(order_number: &str, status: OrderStatus) -> String {
    match status {
        OrderStatus::Approved => format!(
            "Your order #{order_number} has been approved by the seller and is being processed."
        ),
        OrderStatus::Processing => format!(
            "Your order #{order_number} is now being processed and will be prepared for shipment soon."
        ),
        OrderStatus::OutForDelivery => format!(
            "Great news! Your order #{order_number} is out for delivery and will arrive at your address soon."
        ),
        OrderStatus::Completed => {
            format!("Your order #{order_number} has been delivered successfully!")
        }
        OrderStatus::Rejected => format!(
            "Unfortunately, your order #{order_number} has been rejected by the seller."
        ),
        OrderStatus::Cancelled => format!("Your order #{order_number} has been cancelled."),
        OrderStatus::Pending => {
            format!("Your order #{order_number} status has been updated to pending.")
        }
    }
}
