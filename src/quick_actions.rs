//! Quick actions: five simulated IT operations with static results.
//!
//! Nothing here has side effects. Ticket numbers, passwords and network
//! credentials are placeholder text baked into the templates.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    ResetPassword,
    RequestAdminPermission,
    UnblockAccount,
    SubmitTicket,
    RequestWifiAccess,
}

/// A quick action's output, ready for whatever renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickActionResult {
    pub action: QuickAction,
    /// Dialog heading.
    pub title: &'static str,
    /// One-line success banner shown above the body.
    pub notice: &'static str,
    /// Multi-line Markdown body.
    pub body: &'static str,
}

impl QuickAction {
    /// Registry order.
    pub const ALL: [QuickAction; 5] = [
        QuickAction::ResetPassword,
        QuickAction::RequestAdminPermission,
        QuickAction::UnblockAccount,
        QuickAction::SubmitTicket,
        QuickAction::RequestWifiAccess,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QuickAction::ResetPassword => "reset_password",
            QuickAction::RequestAdminPermission => "request_admin_permission",
            QuickAction::UnblockAccount => "unblock_account",
            QuickAction::SubmitTicket => "submit_ticket",
            QuickAction::RequestWifiAccess => "request_wifi_access",
        }
    }

    pub fn from_name(name: &str) -> Option<QuickAction> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            QuickAction::ResetPassword => "🔐 Reset Password",
            QuickAction::RequestAdminPermission => "🔑 Request Admin Permission",
            QuickAction::UnblockAccount => "🔓 Unblock Account",
            QuickAction::SubmitTicket => "🎫 Submit Ticket",
            QuickAction::RequestWifiAccess => "📶 Request WiFi Access",
        }
    }

    pub fn dialog_title(self) -> &'static str {
        match self {
            QuickAction::ResetPassword => "🔐 Reset Password - Action Completed!",
            QuickAction::RequestAdminPermission => "🔑 Admin Permission - Request Submitted!",
            QuickAction::UnblockAccount => "🔓 Unblock Account - Action Completed!",
            QuickAction::SubmitTicket => "🎫 Support Ticket - Created Successfully!",
            QuickAction::RequestWifiAccess => "📶 WiFi Access - Request Processed!",
        }
    }

    pub fn notice(self) -> &'static str {
        match self {
            QuickAction::ResetPassword => "Password reset process has been initiated successfully!",
            QuickAction::RequestAdminPermission => {
                "Admin permission request has been submitted successfully!"
            }
            QuickAction::UnblockAccount => "Account unblock process has been completed successfully!",
            QuickAction::SubmitTicket => "IT support ticket has been created successfully!",
            QuickAction::RequestWifiAccess => "WiFi access request has been processed successfully!",
        }
    }

    /// The static result text.
    pub fn run(self) -> &'static str {
        match self {
            QuickAction::ResetPassword => reset_password(),
            QuickAction::RequestAdminPermission => request_admin_permission(),
            QuickAction::UnblockAccount => unblock_account(),
            QuickAction::SubmitTicket => submit_ticket(),
            QuickAction::RequestWifiAccess => request_wifi_access(),
        }
    }

    pub fn result(self) -> QuickActionResult {
        QuickActionResult {
            action: self,
            title: self.dialog_title(),
            notice: self.notice(),
            body: self.run(),
        }
    }
}

/// By-name lookup returning the action function itself.
pub fn get_quick_action(name: &str) -> Option<fn() -> &'static str> {
    QuickAction::from_name(name).map(|action| match action {
        QuickAction::ResetPassword => reset_password as fn() -> &'static str,
        QuickAction::RequestAdminPermission => request_admin_permission,
        QuickAction::UnblockAccount => unblock_account,
        QuickAction::SubmitTicket => submit_ticket,
        QuickAction::RequestWifiAccess => request_wifi_access,
    })
}

pub fn list_available_actions() -> Vec<&'static str> {
    QuickAction::ALL.iter().map(|a| a.name()).collect()
}

pub fn reset_password() -> &'static str {
    "🔐 Password Reset Process Initiated

✅ Function called: reset_password()

Steps completed:
1. ✅ User identity verified
2. ✅ Temporary password generated: TempPass123!
3. ✅ Password reset email sent to user's registered email
4. ✅ User account flagged for mandatory password change on next login

⚠️ Please remind the user to:
- Check their email (including spam folder)
- Use the temporary password for the next login
- Create a strong new password following company policy
- Contact IT if they don't receive the reset email within 15 minutes"
}

pub fn request_admin_permission() -> &'static str {
    "🔑 Admin Permission Request Submitted

✅ Function called: request_admin_permission()

Request details:
1. ✅ Permission request ticket created: #ADM-2024-0156
2. ✅ Request forwarded to IT Security team
3. ✅ User's manager notified for approval
4. ✅ Estimated approval time: 2-4 business hours

📋 Next steps:
- User will receive email confirmation within 5 minutes
- Manager approval required before IT can process
- Temporary admin access may be granted for urgent tasks
- User will be notified once permissions are activated"
}

pub fn unblock_account() -> &'static str {
    "🔓 Account Unblock Process Completed

✅ Function called: unblock_account()

Actions taken:
1. ✅ Account status verified - was locked due to multiple failed login attempts
2. ✅ Security check completed - no suspicious activity detected
3. ✅ Account successfully unlocked
4. ✅ Failed login counter reset

🔒 Security recommendations:
- Use strong, unique passwords
- Enable two-factor authentication if available
- Avoid password sharing
- Report any suspicious account activity immediately
- Consider using company password manager"
}

pub fn submit_ticket() -> &'static str {
    "🎫 IT Support Ticket Created

✅ Function called: submit_ticket()

Ticket Information:
- Ticket ID: #ITK-2024-0789
- Priority: Standard
- Category: General IT Support
- Status: Open
- Assigned to: IT Support Queue

📞 Contact Information:
- Email updates will be sent automatically
- For urgent issues, call: (555) 123-4567
- Estimated response time: 4-6 business hours
- You can track ticket status using the ticket ID above"
}

pub fn request_wifi_access() -> &'static str {
    "📶 WiFi Access Request Processed

✅ Function called: request_wifi_access()

Network Configuration:
1. ✅ Guest network access enabled
2. ✅ Temporary credentials generated
3. ✅ Access valid for 24 hours
4. ✅ Bandwidth: Standard business profile

🌐 Connection Details:
- Network Name: CompanyGuest
- Password: Guest2024Temp
- Valid until: Tomorrow at this time
- For extended access, please contact your department admin
- Corporate network access requires different authorization process"
}
